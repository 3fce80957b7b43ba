//! Core domain: events for the fight flow.

use bevy::ecs::message::Message;

/// Event fired when the fight is decided
#[derive(Debug)]
pub struct FightEndedEvent {
    pub boss_id: String,
    pub elapsed_combat_seconds: f32,
}

impl Message for FightEndedEvent {}
