//! Core domain: fight-wide state, configuration and pause handling.

mod events;
mod resources;
mod state;
mod systems;

pub use events::FightEndedEvent;
pub use resources::{CombatClockHold, FightConfig, GameplayPaused, gameplay_active};
pub use state::FightState;

use bevy::prelude::*;

use crate::core::systems::{handle_fight_ended, handle_pause_input, log_fight_start, setup_camera};

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<FightState>()
            .init_resource::<GameplayPaused>()
            .init_resource::<CombatClockHold>()
            .add_message::<FightEndedEvent>()
            .add_systems(Startup, (setup_camera, log_fight_start))
            .add_systems(Update, (handle_pause_input, handle_fight_ended));

        if !app.world().contains_resource::<FightConfig>() {
            app.insert_resource(FightConfig::from_env());
        }
    }
}
