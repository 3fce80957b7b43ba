//! Brain domain: the boss's concrete FSM states.

use bevy::prelude::*;
use serde::Serialize;

use crate::brain::boss::BossCore;
use crate::brain::collaborators::{AnimationCue, AnimationTicket};
use crate::brain::fsm::{State, StateDispatcher};
use crate::brain::pattern::Pattern;

/// Distance the target must drift before the chase destination is re-issued
const REPATH_DISTANCE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BossStateTag {
    Idle,
    /// Closing distance while waiting for a pattern to become available
    Engage,
    Execute(Pattern),
    HitReaction,
    PhaseTransition,
    Dead,
}

/// Register one state per tag the boss can be in.
pub(crate) fn register_boss_states(fsm: &mut StateDispatcher<BossStateTag, BossCore>) {
    fsm.register(Box::new(IdleState::default()));
    fsm.register(Box::new(EngageState::default()));
    for pattern in Pattern::ACTIONS {
        fsm.register(Box::new(ExecuteState::new(pattern)));
    }
    fsm.register(Box::new(HitReactionState::default()));
    fsm.register(Box::new(PhaseTransitionState::default()));
    fsm.register(Box::new(DeadState));
}

#[derive(Debug, Default)]
struct IdleState {
    remaining: f32,
}

impl State<BossStateTag, BossCore> for IdleState {
    fn tag(&self) -> BossStateTag {
        BossStateTag::Idle
    }

    fn enter(&mut self, ctx: &mut BossCore) {
        ctx.stop_movement();
        self.remaining = if ctx.selector.combo_pending() {
            0.0
        } else {
            ctx.config.idle_pause_seconds / ctx.attack_speed()
        };
    }

    fn update(&mut self, ctx: &mut BossCore) -> Option<BossStateTag> {
        self.remaining -= ctx.delta;
        (self.remaining <= 0.0 && ctx.frame.has_target()).then_some(BossStateTag::Engage)
    }
}

#[derive(Debug, Default)]
struct EngageState {
    destination: Option<Vec2>,
    /// Stopped at the destination while waiting on cooldowns
    holding: bool,
}

impl State<BossStateTag, BossCore> for EngageState {
    fn tag(&self) -> BossStateTag {
        BossStateTag::Engage
    }

    fn enter(&mut self, ctx: &mut BossCore) {
        self.destination = None;
        self.holding = false;
        ctx.resume_movement();
    }

    fn update(&mut self, ctx: &mut BossCore) -> Option<BossStateTag> {
        let Some(target) = ctx.frame.target_position.filter(|_| ctx.frame.has_target()) else {
            return Some(BossStateTag::Idle);
        };

        if !ctx.phase.is_transitioning() {
            let selection = ctx.select_next();
            if selection.pattern != Pattern::Idle {
                return Some(BossStateTag::Execute(selection.pattern));
            }
        }

        let stale = self
            .destination
            .is_none_or(|d| d.distance(target) > REPATH_DISTANCE);
        if stale {
            if self.holding {
                ctx.resume_movement();
                self.holding = false;
            }
            ctx.move_to(target);
            self.destination = Some(target);
        } else if ctx.frame.movement.arrived && !self.holding {
            ctx.stop_movement();
            self.holding = true;
        }
        None
    }
}

struct ExecuteState {
    pattern: Pattern,
    ticket: Option<AnimationTicket>,
}

impl ExecuteState {
    fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            ticket: None,
        }
    }
}

impl State<BossStateTag, BossCore> for ExecuteState {
    fn tag(&self) -> BossStateTag {
        BossStateTag::Execute(self.pattern)
    }

    fn enter(&mut self, ctx: &mut BossCore) {
        ctx.stop_movement();
        ctx.commit_attack(self.pattern);
        self.ticket = Some(ctx.play(AnimationCue::Pattern(self.pattern)));
    }

    fn update(&mut self, ctx: &mut BossCore) -> Option<BossStateTag> {
        let ticket = self.ticket?;
        if !ctx.animation.is_done(ticket) {
            return None;
        }
        if ctx.selector.combo_pending() {
            Some(BossStateTag::Engage)
        } else {
            Some(BossStateTag::Idle)
        }
    }

    fn exit(&mut self, ctx: &mut BossCore) {
        if let Some(ticket) = self.ticket.take() {
            if !ctx.animation.is_done(ticket) {
                debug!("{} interrupted before its animation finished", self.pattern);
                ctx.animation.cancel();
            }
        }
    }
}

#[derive(Debug, Default)]
struct HitReactionState {
    remaining: f32,
}

impl HitReactionState {
    fn restart(&mut self, ctx: &mut BossCore) {
        self.remaining = ctx.config.hit_reaction_seconds;
        ctx.play(AnimationCue::HitReaction);
    }
}

impl State<BossStateTag, BossCore> for HitReactionState {
    fn tag(&self) -> BossStateTag {
        BossStateTag::HitReaction
    }

    fn enter(&mut self, ctx: &mut BossCore) {
        ctx.stop_movement();
        ctx.selector.cancel_combo();
        self.restart(ctx);
    }

    fn update(&mut self, ctx: &mut BossCore) -> Option<BossStateTag> {
        self.remaining -= ctx.delta;
        (self.remaining <= 0.0).then_some(BossStateTag::Idle)
    }

    fn exit(&mut self, ctx: &mut BossCore) {
        ctx.animation.cancel();
        if !ctx.is_dead() {
            ctx.recover_poise(None);
        }
    }

    fn supports_reentry(&self) -> bool {
        true
    }

    fn re_enter(&mut self, ctx: &mut BossCore) {
        self.restart(ctx);
    }
}

#[derive(Debug, Default)]
struct PhaseTransitionState {
    ticket: Option<AnimationTicket>,
    /// Super-armour set from outside before the transition began
    was_infinite: bool,
}

impl State<BossStateTag, BossCore> for PhaseTransitionState {
    fn tag(&self) -> BossStateTag {
        BossStateTag::PhaseTransition
    }

    fn enter(&mut self, ctx: &mut BossCore) {
        ctx.stop_movement();
        ctx.selector.on_phase_transition();
        self.was_infinite = ctx.poise.is_infinite();
        ctx.poise.set_infinite(true);

        let plays_transition = ctx
            .phases
            .descriptor(ctx.phase.index())
            .is_none_or(|p| p.plays_transition);
        self.ticket = plays_transition.then(|| ctx.play(AnimationCue::PhaseTransition));
    }

    fn update(&mut self, ctx: &mut BossCore) -> Option<BossStateTag> {
        if let Some(ticket) = self.ticket {
            if !ctx.animation.is_done(ticket) {
                return None;
            }
        }
        ctx.complete_phase_transition();
        Some(BossStateTag::Idle)
    }

    fn exit(&mut self, ctx: &mut BossCore) {
        self.ticket = None;
        ctx.poise.set_infinite(self.was_infinite);
    }
}

struct DeadState;

impl State<BossStateTag, BossCore> for DeadState {
    fn tag(&self) -> BossStateTag {
        BossStateTag::Dead
    }

    fn enter(&mut self, ctx: &mut BossCore) {
        ctx.stop_movement();
        ctx.selector.cancel_combo();
        ctx.animation.cancel();
        ctx.play(AnimationCue::Death);
    }

    fn update(&mut self, _ctx: &mut BossCore) -> Option<BossStateTag> {
        None
    }
}
