//! Combat domain: components and the ECS-side collaborators of the boss brain.

use bevy::prelude::*;

use crate::brain::{
    AllyCensus, AnimationCue, AnimationDriver, AnimationTicket, AttackIntent, CombatResolver,
    MovementDriver,
};
use crate::content::AnimationTimings;

/// Marks an entity as a combat participant
#[derive(Component, Debug)]
pub struct Combatant;

/// Boss marker with the content id it was spawned from
#[derive(Component, Debug, Clone)]
pub struct Boss {
    pub def_id: String,
}

/// What the boss chases and attacks
#[derive(Component, Debug)]
pub struct Target;

/// A minion summoned by a boss
#[derive(Component, Debug, Clone, Copy)]
pub struct Ally {
    pub owner: Entity,
}

/// Health component for damageable entities
#[derive(Component, Debug, Clone)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.current);
        self.current -= actual;
        actual
    }

    pub fn heal(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.max - self.current);
        self.current += actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percent(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

/// Movement collaborator: where the boss is headed and how fast, in world
/// units. Physics reads this to drive `LinearVelocity`.
#[derive(Component, Debug, Clone)]
pub struct BossMotor {
    pub destination: Option<Vec2>,
    pub speed: f32,
    pub stopped: bool,
    /// Distance left to the destination, refreshed by the movement system
    pub remaining: f32,
    pub arrival_radius: f32,
}

impl Default for BossMotor {
    fn default() -> Self {
        Self {
            destination: None,
            speed: 0.0,
            stopped: true,
            remaining: 0.0,
            arrival_radius: 0.75,
        }
    }
}

impl BossMotor {
    /// Desired velocity in world units per second from `position`.
    pub fn desired_velocity(&self, position: Vec2) -> Vec2 {
        match self.destination {
            Some(destination) if !self.stopped && !self.has_arrived() => {
                (destination - position).normalize_or_zero() * self.speed
            }
            _ => Vec2::ZERO,
        }
    }
}

impl MovementDriver for BossMotor {
    fn move_to(&mut self, destination: Vec2) {
        self.destination = Some(destination);
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn resume(&mut self) {
        self.stopped = false;
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining
    }

    fn has_arrived(&self) -> bool {
        self.destination.is_some() && self.remaining <= self.arrival_radius
    }
}

/// Animation collaborator: plays one cue at a time on a timer and reports
/// the finished ticket.
#[derive(Component, Debug, Clone, Default)]
pub struct BossAnimator {
    pub timings: AnimationTimings,
    pub playing: Option<PlayingCue>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayingCue {
    pub cue: AnimationCue,
    pub ticket: AnimationTicket,
    pub remaining: f32,
}

impl BossAnimator {
    pub fn new(timings: AnimationTimings) -> Self {
        Self {
            timings,
            playing: None,
        }
    }

    /// Advance the current cue. Returns its ticket on the frame it finishes.
    pub fn advance(&mut self, delta: f32) -> Option<AnimationTicket> {
        let playing = self.playing.as_mut()?;
        playing.remaining -= delta;
        if playing.remaining > 0.0 {
            return None;
        }
        self.playing.take().map(|p| p.ticket)
    }
}

impl AnimationDriver for BossAnimator {
    fn play(&mut self, cue: AnimationCue, ticket: AnimationTicket, playback_speed: f32) {
        let speed = if playback_speed > 0.0 { playback_speed } else { 1.0 };
        // A new cue interrupts the old one, whose completion is never reported
        self.playing = Some(PlayingCue {
            cue,
            ticket,
            remaining: self.timings.seconds_for(cue) / speed,
        });
    }
}

/// Combat collaborator: collects the attack intents committed this frame.
#[derive(Debug, Default)]
pub struct IntentBuffer {
    pub intents: Vec<AttackIntent>,
}

impl CombatResolver for IntentBuffer {
    fn commit(&mut self, intent: AttackIntent) {
        self.intents.push(intent);
    }
}

/// Live ally count for one boss
#[derive(Debug, Clone, Copy, Default)]
pub struct AllyCount(pub u32);

impl AllyCensus for AllyCount {
    fn alive_ally_count(&self) -> u32 {
        self.0
    }
}

/// Tracks whether a boss's summons were all killed since they last existed.
#[derive(Component, Debug, Default)]
pub struct AllyRoster {
    pub peak: u32,
}

impl AllyRoster {
    /// Record this frame's count. Returns true when a non-empty roster just
    /// dropped to zero.
    pub fn observe(&mut self, alive: u32) -> bool {
        if alive > self.peak {
            self.peak = alive;
        }
        if alive == 0 && self.peak > 0 {
            self.peak = 0;
            return true;
        }
        false
    }
}
