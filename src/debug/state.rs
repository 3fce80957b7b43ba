//! Debug domain: state for the brain inspection hotkeys.

use bevy::prelude::*;

/// Seconds between snapshots while periodic logging is on
pub const SNAPSHOT_INTERVAL: f32 = 1.0;

/// Resource tracking debug mode state
#[derive(Resource, Debug)]
pub struct DebugState {
    /// Whether boss snapshots are logged on a timer
    pub periodic_snapshots: bool,
    pub snapshot_timer: f32,
    /// Whether boss poise is pinned to infinite
    pub poise_locked: bool,
}

impl Default for DebugState {
    fn default() -> Self {
        Self {
            periodic_snapshots: false,
            snapshot_timer: SNAPSHOT_INTERVAL,
            poise_locked: false,
        }
    }
}

impl DebugState {
    /// Advance the snapshot timer. Returns true when a snapshot is due.
    pub fn snapshot_due(&mut self, delta: f32) -> bool {
        if !self.periodic_snapshots {
            return false;
        }
        self.snapshot_timer -= delta;
        if self.snapshot_timer > 0.0 {
            return false;
        }
        self.snapshot_timer = SNAPSHOT_INTERVAL;
        true
    }
}
