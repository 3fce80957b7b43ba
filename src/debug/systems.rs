//! Debug domain: hotkeys for inspecting and poking boss brains.

use bevy::prelude::*;

use crate::brain::BossBrain;
use crate::combat::Boss;
use crate::debug::state::{DebugState, SNAPSHOT_INTERVAL};

/// F3 logs a snapshot now, F4 toggles periodic snapshots
pub(crate) fn handle_snapshot_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    boss_query: Query<(&Boss, &BossBrain)>,
) {
    if keyboard.just_pressed(KeyCode::F3) {
        log_snapshots(&boss_query);
    }

    if keyboard.just_pressed(KeyCode::F4) {
        debug_state.periodic_snapshots = !debug_state.periodic_snapshots;
        debug_state.snapshot_timer = SNAPSHOT_INTERVAL;
        info!(
            "Periodic brain snapshots {}",
            if debug_state.periodic_snapshots { "on" } else { "off" }
        );
    }
}

pub(crate) fn tick_periodic_snapshots(
    time: Res<Time>,
    mut debug_state: ResMut<DebugState>,
    boss_query: Query<(&Boss, &BossBrain)>,
) {
    if debug_state.snapshot_due(time.delta_secs()) {
        log_snapshots(&boss_query);
    }
}

/// F5 pins poise to infinite, F6 calms an enraged boss, F7 kills it
pub(crate) fn handle_brain_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    mut boss_query: Query<(&Boss, &mut BossBrain)>,
) {
    if keyboard.just_pressed(KeyCode::F5) {
        debug_state.poise_locked = !debug_state.poise_locked;
        for (boss, mut brain) in &mut boss_query {
            brain.set_poise_infinite(debug_state.poise_locked);
            info!(
                "Boss '{}' poise {}",
                boss.def_id,
                if debug_state.poise_locked { "locked" } else { "unlocked" }
            );
        }
    }

    if keyboard.just_pressed(KeyCode::F6) {
        for (boss, mut brain) in &mut boss_query {
            if brain.is_escalated() {
                brain.end_escalation();
                info!("Boss '{}' escalation ended", boss.def_id);
            }
        }
    }

    if keyboard.just_pressed(KeyCode::F7) {
        for (boss, mut brain) in &mut boss_query {
            warn!("Killing boss '{}'", boss.def_id);
            brain.kill();
        }
    }
}

fn log_snapshots(boss_query: &Query<(&Boss, &BossBrain)>) {
    for (boss, brain) in boss_query {
        match serde_json::to_string_pretty(&brain.snapshot()) {
            Ok(json) => info!("Boss '{}' brain:\n{}", boss.def_id, json),
            Err(e) => error!("Failed to serialize brain of '{}': {}", boss.def_id, e),
        }
    }
}
