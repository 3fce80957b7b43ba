//! Combat domain: combat-related events.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::brain::{AnimationTicket, EscalationTrigger, Pattern};

#[derive(Debug)]
pub struct DamageEvent {
    pub source: Option<Entity>,
    pub target: Entity,
    pub amount: f32,
    /// Stagger damage applied to the target's poise, if it has any
    pub poise_damage: f32,
}

impl Message for DamageEvent {}

#[derive(Debug)]
pub struct DeathEvent {
    pub entity: Entity,
}

impl Message for DeathEvent {}

/// Event emitted when a boss commits to an attack pattern
#[derive(Debug)]
pub struct AttackCommittedEvent {
    pub boss: Entity,
    pub pattern: Pattern,
    pub damage_multiplier: f32,
}

impl Message for AttackCommittedEvent {}

/// Event emitted when a boss's animation driver finishes a cue
#[derive(Debug)]
pub struct AnimationFinishedEvent {
    pub boss: Entity,
    pub ticket: AnimationTicket,
}

impl Message for AnimationFinishedEvent {}

#[derive(Debug)]
pub struct BossPhaseChangeEvent {
    pub boss: Entity,
    pub phase_index: usize,
    pub phase_name: Option<String>,
}

impl Message for BossPhaseChangeEvent {}

#[derive(Debug)]
pub struct BossEscalatedEvent {
    pub boss: Entity,
    pub trigger: EscalationTrigger,
}

impl Message for BossEscalatedEvent {}

/// Event emitted when a boss's poise breaks
#[derive(Debug)]
pub struct StanceBreakEvent {
    pub boss: Entity,
}

impl Message for StanceBreakEvent {}

#[derive(Debug)]
pub struct BossDefeatedEvent {
    pub boss: Entity,
}

impl Message for BossDefeatedEvent {}
