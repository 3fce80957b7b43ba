//! Core domain: fight flow systems and setup.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::core::events::FightEndedEvent;
use crate::core::resources::{CombatClockHold, FightConfig, GameplayPaused};
use crate::core::state::FightState;

/// Source name used by the pause hotkey
const PAUSE_SOURCE: &str = "pause_key";
/// Source name used by the cutscene hotkey
const CUTSCENE_SOURCE: &str = "cutscene_key";

pub(crate) fn log_fight_start(config: Res<FightConfig>) {
    info!(
        "Starting fight with seed: {}, boss: {}",
        config.seed,
        config.boss_id.as_deref().unwrap_or("<first loaded>")
    );
}

/// P toggles a gameplay pause; C toggles a scripted hold on the combat clock
pub(crate) fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut paused: ResMut<GameplayPaused>,
    mut clock_hold: ResMut<CombatClockHold>,
) {
    if keyboard.just_pressed(KeyCode::KeyP) {
        let now_paused = paused.toggle(PAUSE_SOURCE);
        info!("Gameplay {}", if now_paused { "paused" } else { "resumed" });
    }

    if keyboard.just_pressed(KeyCode::KeyC) {
        if clock_hold.sources.contains(CUTSCENE_SOURCE) {
            clock_hold.release(CUTSCENE_SOURCE);
            info!("Combat clock released");
        } else {
            clock_hold.hold(CUTSCENE_SOURCE);
            info!("Combat clock held for cutscene");
        }
    }
}

/// Handle the fight ending - transition to the over state
pub(crate) fn handle_fight_ended(
    mut events: MessageReader<FightEndedEvent>,
    mut fight_state: ResMut<NextState<FightState>>,
) {
    for event in events.read() {
        info!(
            "Victory! '{}' defeated after {:.1}s of combat.",
            event.boss_id, event.elapsed_combat_seconds
        );
        fight_state.set(FightState::Over);
    }
}

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
