//! Brain domain: contracts with the animation, movement, combat, and ally
//! collaborators, plus the outbox the brain writes its requests into.

use bevy::prelude::*;
use serde::Serialize;

use crate::brain::escalation::EscalationTrigger;
use crate::brain::pattern::Pattern;
use crate::brain::phase::PhaseDescriptor;

/// Handle for one "play and notify me" request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AnimationTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AnimationCue {
    Pattern(Pattern),
    HitReaction,
    PhaseTransition,
    Death,
}

/// "Commit to pattern X with multiplier Y"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackIntent {
    pub pattern: Pattern,
    pub damage_multiplier: f32,
}

/// Requests addressed to collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum BossCommand {
    PlayAnimation {
        cue: AnimationCue,
        ticket: AnimationTicket,
        playback_speed: f32,
    },
    MoveTo(Vec2),
    StopMovement,
    ResumeMovement,
    /// Absolute speed: base speed times the active multiplier
    SetSpeed(f32),
    CommitAttack(AttackIntent),
}

/// Notifications about the fight, for hosts that want to react
#[derive(Debug, Clone, PartialEq)]
pub enum BossEvent {
    PatternSelected {
        pattern: Pattern,
        from_combo: bool,
        combo_started: bool,
    },
    PhaseTransitionBegan {
        index: usize,
        descriptor: Option<PhaseDescriptor>,
    },
    PhaseTransitionCompleted {
        index: usize,
    },
    Escalated {
        trigger: EscalationTrigger,
        damage_multiplier: f32,
        speed_multiplier: f32,
    },
    PoiseBroken,
    PoiseRecovered {
        value: f32,
    },
    Died,
}

pub trait AnimationDriver {
    /// Start `cue`. The driver reports completion at most once through
    /// `BossBrain::on_animation_complete(ticket)`, and never if interrupted.
    fn play(&mut self, cue: AnimationCue, ticket: AnimationTicket, playback_speed: f32);
}

pub trait MovementDriver {
    fn move_to(&mut self, destination: Vec2);
    fn stop(&mut self);
    fn resume(&mut self);
    fn set_speed(&mut self, speed: f32);
    fn remaining_distance(&self) -> f32;
    fn has_arrived(&self) -> bool;
}

pub trait CombatResolver {
    fn commit(&mut self, intent: AttackIntent);
}

pub trait AllyCensus {
    fn alive_ally_count(&self) -> u32;
}

/// What the movement driver reported this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementReport {
    pub remaining_distance: f32,
    pub arrived: bool,
}

impl MovementReport {
    pub fn from_driver(driver: &impl MovementDriver) -> Self {
        Self {
            remaining_distance: driver.remaining_distance(),
            arrived: driver.has_arrived(),
        }
    }
}

/// Per-frame perception fed to the brain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// `f32::INFINITY` when there is no target
    pub distance_to_target: f32,
    pub target_position: Option<Vec2>,
    pub health_ratio: f32,
    pub alive_allies: u32,
    pub movement: MovementReport,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            distance_to_target: f32::INFINITY,
            target_position: None,
            health_ratio: 1.0,
            alive_allies: 0,
            movement: MovementReport::default(),
        }
    }
}

impl FrameInput {
    pub fn new(distance_to_target: f32, health_ratio: f32) -> Self {
        Self {
            distance_to_target,
            health_ratio,
            ..default()
        }
    }

    /// Fill distance and target position from both positions.
    pub fn at(boss: Vec2, target: Vec2, health_ratio: f32) -> Self {
        Self {
            distance_to_target: boss.distance(target),
            target_position: Some(target),
            health_ratio,
            ..default()
        }
    }

    pub fn with_target(mut self, position: Vec2) -> Self {
        self.target_position = Some(position);
        self
    }

    pub fn with_allies(mut self, census: &impl AllyCensus) -> Self {
        self.alive_allies = census.alive_ally_count();
        self
    }

    pub fn with_movement(mut self, driver: &impl MovementDriver) -> Self {
        self.movement = MovementReport::from_driver(driver);
        self
    }

    pub fn has_target(&self) -> bool {
        self.target_position.is_some() && self.distance_to_target.is_finite()
    }
}

/// Commands and events produced during a tick, drained by the host.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    commands: Vec<BossCommand>,
    events: Vec<BossEvent>,
}

impl Outbox {
    pub fn command(&mut self, command: BossCommand) {
        self.commands.push(command);
    }

    pub fn event(&mut self, event: BossEvent) {
        self.events.push(event);
    }

    pub fn commands(&self) -> &[BossCommand] {
        &self.commands
    }

    pub fn events(&self) -> &[BossEvent] {
        &self.events
    }

    pub fn drain_commands(&mut self) -> std::vec::Drain<'_, BossCommand> {
        self.commands.drain(..)
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, BossEvent> {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.events.clear();
    }

    /// Route every pending command to its collaborator, in issue order.
    pub fn dispatch(
        &mut self,
        animation: &mut impl AnimationDriver,
        movement: &mut impl MovementDriver,
        combat: &mut impl CombatResolver,
    ) {
        for command in self.commands.drain(..) {
            match command {
                BossCommand::PlayAnimation {
                    cue,
                    ticket,
                    playback_speed,
                } => animation.play(cue, ticket, playback_speed),
                BossCommand::MoveTo(destination) => movement.move_to(destination),
                BossCommand::StopMovement => movement.stop(),
                BossCommand::ResumeMovement => movement.resume(),
                BossCommand::SetSpeed(speed) => movement.set_speed(speed),
                BossCommand::CommitAttack(intent) => combat.commit(intent),
            }
        }
    }
}

/// The single outstanding animation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationSlot {
    next_ticket: u64,
    outstanding: Option<(AnimationTicket, AnimationCue)>,
    completed: Option<AnimationTicket>,
}

impl AnimationSlot {
    /// Issue a play request, superseding any outstanding one.
    pub fn request(
        &mut self,
        cue: AnimationCue,
        playback_speed: f32,
        outbox: &mut Outbox,
    ) -> AnimationTicket {
        self.next_ticket += 1;
        let ticket = AnimationTicket(self.next_ticket);
        self.outstanding = Some((ticket, cue));
        self.completed = None;
        outbox.command(BossCommand::PlayAnimation {
            cue,
            ticket,
            playback_speed: if playback_speed > 0.0 { playback_speed } else { 1.0 },
        });
        ticket
    }

    /// Accept a completion. Stale or unknown tickets are ignored.
    pub fn complete(&mut self, ticket: AnimationTicket) -> Option<AnimationCue> {
        match self.outstanding {
            Some((outstanding, cue)) if outstanding == ticket => {
                self.outstanding = None;
                self.completed = Some(ticket);
                Some(cue)
            }
            _ => None,
        }
    }

    pub fn is_done(&self, ticket: AnimationTicket) -> bool {
        self.completed == Some(ticket)
    }

    pub fn outstanding(&self) -> Option<(AnimationTicket, AnimationCue)> {
        self.outstanding
    }

    /// Drop the outstanding request; its completion will be ignored.
    pub fn cancel(&mut self) {
        self.outstanding = None;
        self.completed = None;
    }
}
