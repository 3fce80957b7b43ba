//! Combat domain: the ECS side of the boss fight.

mod ai;
mod components;
mod events;
mod resources;
mod spawn;
mod systems;

pub use components::{
    Ally, AllyCount, AllyRoster, Boss, BossAnimator, BossMotor, Combatant, Health, IntentBuffer,
    PlayingCue, Target,
};
pub use events::{
    AnimationFinishedEvent, AttackCommittedEvent, BossDefeatedEvent, BossEscalatedEvent,
    BossPhaseChangeEvent, DamageEvent, DeathEvent, StanceBreakEvent,
};
pub use resources::CombatTuning;
pub use spawn::{spawn_ally, spawn_boss, spawn_target};

use bevy::prelude::*;

use crate::combat::ai::{
    advance_boss_animations, apply_boss_movement, dispatch_boss_commands, log_boss_milestones,
    update_boss_brains,
};
use crate::combat::spawn::spawn_fight;
use crate::combat::systems::{
    apply_damage, handle_boss_defeated, move_target, process_deaths, read_sandbox_input,
    resolve_boss_attacks,
};
use crate::core::{FightState, gameplay_active};

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CombatTuning>()
            .add_message::<DamageEvent>()
            .add_message::<DeathEvent>()
            .add_message::<AttackCommittedEvent>()
            .add_message::<AnimationFinishedEvent>()
            .add_message::<BossPhaseChangeEvent>()
            .add_message::<BossEscalatedEvent>()
            .add_message::<StanceBreakEvent>()
            .add_message::<BossDefeatedEvent>()
            .add_systems(Startup, spawn_fight)
            .add_systems(
                Update,
                (read_sandbox_input, move_target)
                    .run_if(gameplay_active)
                    .run_if(in_state(FightState::Fighting)),
            )
            .add_systems(
                Update,
                (
                    update_boss_brains,
                    dispatch_boss_commands,
                    advance_boss_animations,
                    apply_boss_movement,
                    resolve_boss_attacks,
                    apply_damage,
                    process_deaths,
                    handle_boss_defeated,
                )
                    .chain()
                    .after(read_sandbox_input)
                    .run_if(gameplay_active),
            )
            .add_systems(Update, log_boss_milestones.after(dispatch_boss_commands));
    }
}
