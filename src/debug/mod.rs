//! Debug domain: hotkeys for inspecting boss brains during a fight.
//!
//! - F3: log every boss's brain snapshot as JSON
//! - F4: toggle snapshots once per second
//! - F5: toggle infinite poise
//! - F6: end escalation
//! - F7: kill the boss

mod state;
mod systems;

pub use state::{DebugState, SNAPSHOT_INTERVAL};

use bevy::prelude::*;

use crate::debug::systems::{
    handle_brain_hotkeys, handle_snapshot_hotkeys, tick_periodic_snapshots,
};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>().add_systems(
            Update,
            (
                handle_snapshot_hotkeys,
                tick_periodic_snapshots,
                handle_brain_hotkeys,
            )
                .chain(),
        );
    }
}
