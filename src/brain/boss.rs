//! Brain domain: the boss brain that owns every decision component and
//! drives them once per frame.

use bevy::prelude::*;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::brain::collaborators::{
    AnimationCue, AnimationDriver, AnimationSlot, AnimationTicket, AttackIntent, BossCommand,
    BossEvent, CombatResolver, FrameInput, MovementDriver, Outbox,
};
use crate::brain::escalation::{EscalationConfig, EscalationMonitor, EscalationTrigger};
use crate::brain::fsm::StateDispatcher;
use crate::brain::pattern::Pattern;
use crate::brain::phase::{PhaseDescriptor, PhaseState, PhaseTable};
use crate::brain::poise::{PoiseConfig, PoiseTracker};
use crate::brain::selector::{PatternSelector, Selection, SelectionContext, SelectorTuning};
use crate::brain::states::{BossStateTag, register_boss_states};

/// Everything needed to build a boss brain.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct BossConfig {
    pub base_move_speed: f32,
    /// Pause between patterns at attack speed 1.0
    pub idle_pause_seconds: f32,
    pub hit_reaction_seconds: f32,
    pub selector: SelectorTuning,
    pub phases: Vec<PhaseDescriptor>,
    pub escalation: EscalationConfig,
    pub poise: PoiseConfig,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            base_move_speed: 3.0,
            idle_pause_seconds: 0.6,
            hit_reaction_seconds: 2.0,
            selector: SelectorTuning::default(),
            phases: Vec::new(),
            escalation: EscalationConfig::default(),
            poise: PoiseConfig::default(),
        }
    }
}

/// Shared state the FSM states read and mutate.
pub struct BossCore {
    pub config: BossConfig,
    pub phases: PhaseTable,
    pub phase: PhaseState,
    pub escalation: EscalationMonitor,
    pub poise: PoiseTracker,
    pub selector: PatternSelector,
    pub animation: AnimationSlot,
    pub outbox: Outbox,
    /// Perception for the current frame
    pub frame: FrameInput,
    /// Seconds covered by the current frame
    pub delta: f32,
    elapsed_combat: f32,
    clock_paused: bool,
    allies_wiped: bool,
    dead: bool,
    rng: Box<dyn RngCore + Send + Sync>,
}

impl BossCore {
    fn new(config: BossConfig, rng: Box<dyn RngCore + Send + Sync>) -> Self {
        Self {
            phases: PhaseTable::new(config.phases.clone()),
            phase: PhaseState::default(),
            escalation: EscalationMonitor::new(config.escalation.clone()),
            poise: PoiseTracker::new(&config.poise),
            selector: PatternSelector::new(config.selector.clone()),
            animation: AnimationSlot::default(),
            outbox: Outbox::default(),
            frame: FrameInput::default(),
            delta: 0.0,
            elapsed_combat: 0.0,
            clock_paused: false,
            allies_wiped: false,
            dead: false,
            rng,
            config,
        }
    }

    pub fn active_phase(&self) -> Option<&PhaseDescriptor> {
        self.phases.descriptor(self.phase.index())
    }

    pub fn attack_speed(&self) -> f32 {
        let speed = self.phases.attack_speed_multiplier(self.phase.index());
        if speed > 0.0 { speed } else { 1.0 }
    }

    /// Phase damage times escalation damage
    pub fn damage_multiplier(&self) -> f32 {
        self.phases.damage_multiplier(self.phase.index()) * self.escalation.damage_multiplier()
    }

    pub fn move_speed(&self) -> f32 {
        self.config.base_move_speed * self.escalation.speed_multiplier()
    }

    /// Run the pattern selector against this frame's perception.
    pub fn select_next(&mut self) -> Selection {
        let ctx = SelectionContext {
            distance: self.frame.distance_to_target,
            health_ratio: self.frame.health_ratio,
            alive_allies: self.frame.alive_allies,
            phase: self.phases.descriptor(self.phase.index()),
            phase_number: self.phase.number(),
            escalation_cooldown_multiplier: self.escalation.cooldown_multiplier(),
        };
        let selection = self.selector.select(&ctx, self.rng.as_mut());
        if selection.pattern != Pattern::Idle {
            self.outbox.event(BossEvent::PatternSelected {
                pattern: selection.pattern,
                from_combo: selection.from_combo,
                combo_started: selection.combo_started,
            });
        }
        selection
    }

    pub fn play(&mut self, cue: AnimationCue) -> AnimationTicket {
        let speed = self.attack_speed();
        self.animation.request(cue, speed, &mut self.outbox)
    }

    pub fn commit_attack(&mut self, pattern: Pattern) {
        let intent = AttackIntent {
            pattern,
            damage_multiplier: self.damage_multiplier(),
        };
        self.outbox.command(BossCommand::CommitAttack(intent));
    }

    pub fn move_to(&mut self, destination: Vec2) {
        self.outbox.command(BossCommand::MoveTo(destination));
    }

    pub fn stop_movement(&mut self) {
        self.outbox.command(BossCommand::StopMovement);
    }

    pub fn resume_movement(&mut self) {
        self.outbox.command(BossCommand::ResumeMovement);
    }

    pub fn recover_poise(&mut self, amount: Option<f32>) {
        let value = self.poise.recover(amount);
        info!("Boss poise recovered to {:.1}/{:.1}", value, self.poise.max());
        self.outbox.event(BossEvent::PoiseRecovered { value });
    }

    pub fn complete_phase_transition(&mut self) {
        if self.phase.complete_transition() {
            let index = self.phase.index();
            info!("Boss phase {} transition complete", index + 1);
            self.outbox.event(BossEvent::PhaseTransitionCompleted { index });
        }
    }

    pub fn elapsed_combat_seconds(&self) -> f32 {
        self.elapsed_combat
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }
}

/// A boss's decision-making core.
///
/// Feed it one [`FrameInput`] per frame through [`BossBrain::tick`], report
/// hits and finished animations as they happen, and drain its outbox into
/// the animation, movement, and combat collaborators.
#[derive(Component)]
pub struct BossBrain {
    core: BossCore,
    fsm: StateDispatcher<BossStateTag, BossCore>,
}

impl BossBrain {
    /// Brain with a seeded `ChaCha8Rng`, replayable for a given seed.
    pub fn new(config: BossConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(config: BossConfig, rng: impl RngCore + Send + Sync + 'static) -> Self {
        let mut core = BossCore::new(config, Box::new(rng));
        let speed = core.move_speed();
        core.outbox.command(BossCommand::SetSpeed(speed));

        let mut fsm = StateDispatcher::new();
        register_boss_states(&mut fsm);

        let mut brain = Self { core, fsm };
        if let Err(err) = brain.fsm.initialize(BossStateTag::Idle, &mut brain.core) {
            error!("Boss brain failed to start: {}", err);
        }
        brain
    }

    /// Advance the fight by `delta` seconds.
    pub fn tick(&mut self, delta: f32, input: FrameInput) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.core.frame = input;
        self.core.delta = delta;

        self.core.selector.tick(delta);

        if !self.core.dead {
            if !self.core.clock_paused {
                self.core.elapsed_combat += delta;
            }
            self.core.poise.regenerate(delta);

            if input.health_ratio <= 0.0 {
                self.kill();
            } else {
                self.evaluate_phase();
                self.evaluate_escalation();
            }
        }

        if let Err(err) = self.fsm.update(&mut self.core) {
            debug!("Boss brain update skipped: {}", err);
        }
    }

    fn evaluate_phase(&mut self) {
        let hp = self.core.frame.health_ratio;
        let Some(next) = self.core.phases.evaluate(hp, &self.core.phase) else {
            return;
        };
        if !self.core.phase.begin_transition(next) {
            return;
        }

        let descriptor = self.core.phases.descriptor(next).cloned();
        info!(
            "Boss entering phase {} '{}' at {:.0}% health",
            next + 1,
            descriptor.as_ref().map_or("", |d| d.name.as_str()),
            hp * 100.0
        );
        self.core.outbox.event(BossEvent::PhaseTransitionBegan {
            index: next,
            descriptor,
        });
        let _ = self.fsm.change_state(BossStateTag::PhaseTransition, &mut self.core);
    }

    fn evaluate_escalation(&mut self) {
        let core = &mut self.core;
        let Some(trigger) = core.escalation.evaluate(
            core.frame.health_ratio,
            core.elapsed_combat,
            core.allies_wiped,
        ) else {
            return;
        };

        core.outbox.event(BossEvent::Escalated {
            trigger,
            damage_multiplier: core.escalation.damage_multiplier(),
            speed_multiplier: core.escalation.speed_multiplier(),
        });
        let speed = core.move_speed();
        core.outbox.command(BossCommand::SetSpeed(speed));
    }

    /// Stagger damage from a resolved hit. Returns true if poise broke.
    ///
    /// A break forces the hit reaction; further hits while reacting restart it
    /// unless poise is infinite.
    pub fn apply_poise_damage(&mut self, amount: f32) -> bool {
        if self.core.dead {
            return false;
        }

        let broke = self.core.poise.apply_damage(amount);
        if broke {
            info!("Boss poise broken");
            self.core.outbox.event(BossEvent::PoiseBroken);
        }

        let reacting = self.fsm.is_in(BossStateTag::HitReaction);
        let staggers = reacting && amount > 0.0 && !self.core.poise.is_infinite();
        if broke || staggers {
            let _ = self.fsm.change_state(BossStateTag::HitReaction, &mut self.core);
        }
        broke
    }

    /// Completion callback from the animation driver. Returns false for
    /// stale tickets.
    pub fn on_animation_complete(&mut self, ticket: AnimationTicket) -> bool {
        match self.core.animation.complete(ticket) {
            Some(cue) => {
                debug!("Animation {:?} finished ({:?})", cue, ticket);
                true
            }
            None => false,
        }
    }

    /// Latch the "all summoned allies died" signal for the escalation monitor.
    pub fn notify_all_allies_dead(&mut self) {
        if !self.core.allies_wiped {
            info!("Boss allies wiped out");
            self.core.allies_wiped = true;
        }
    }

    /// Force the boss into its terminal state.
    pub fn kill(&mut self) {
        if self.core.dead {
            return;
        }
        self.core.dead = true;
        info!("Boss defeated after {:.1}s of combat", self.core.elapsed_combat);
        self.core.outbox.event(BossEvent::Died);
        let _ = self.fsm.change_state(BossStateTag::Dead, &mut self.core);
    }

    /// Hold the combat clock (cutscenes, pauses).
    pub fn set_clock_paused(&mut self, paused: bool) {
        self.core.clock_paused = paused;
    }

    /// Scripted super-armor for patterns that must not be interrupted.
    pub fn set_poise_infinite(&mut self, infinite: bool) {
        self.core.poise.set_infinite(infinite);
    }

    /// Scripted exception: drop the enrage bonuses.
    pub fn end_escalation(&mut self) {
        if !self.core.escalation.is_escalated() {
            return;
        }
        self.core.escalation.end_escalation();
        let speed = self.core.move_speed();
        self.core.outbox.command(BossCommand::SetSpeed(speed));
    }

    /// Route pending commands to the collaborators.
    pub fn dispatch(
        &mut self,
        animation: &mut impl AnimationDriver,
        movement: &mut impl MovementDriver,
        combat: &mut impl CombatResolver,
    ) {
        self.core.outbox.dispatch(animation, movement, combat);
    }

    pub fn drain_commands(&mut self) -> Vec<BossCommand> {
        self.core.outbox.drain_commands().collect()
    }

    pub fn drain_events(&mut self) -> Vec<BossEvent> {
        self.core.outbox.drain_events().collect()
    }

    pub fn state(&self) -> Option<BossStateTag> {
        self.fsm.current()
    }

    pub fn core(&self) -> &BossCore {
        &self.core
    }

    pub fn phase_index(&self) -> usize {
        self.core.phase.index()
    }

    pub fn is_transitioning(&self) -> bool {
        self.core.phase.is_transitioning()
    }

    pub fn is_escalated(&self) -> bool {
        self.core.escalation.is_escalated()
    }

    pub fn is_dead(&self) -> bool {
        self.core.dead
    }

    pub fn poise(&self) -> &PoiseTracker {
        &self.core.poise
    }

    pub fn selector(&self) -> &PatternSelector {
        &self.core.selector
    }

    pub fn escalation(&self) -> &EscalationMonitor {
        &self.core.escalation
    }

    pub fn elapsed_combat_seconds(&self) -> f32 {
        self.core.elapsed_combat
    }

    pub fn outstanding_animation(&self) -> Option<(AnimationTicket, AnimationCue)> {
        self.core.animation.outstanding()
    }

    pub fn snapshot(&self) -> BrainSnapshot {
        let core = &self.core;
        BrainSnapshot {
            state: self.fsm.current(),
            phase_number: core.phase.number(),
            phase_name: core.active_phase().map(|p| p.name.clone()),
            transitioning: core.phase.is_transitioning(),
            escalated: core.escalation.is_escalated(),
            escalation_trigger: core.escalation.trigger(),
            poise: core.poise.current(),
            poise_max: core.poise.max(),
            poise_infinite: core.poise.is_infinite(),
            elapsed_combat_seconds: core.elapsed_combat,
            cooldowns: core.selector.ledger().iter().collect(),
            combo_queue: core.selector.combo().pending().collect(),
            last_pick: core.selector.last_pick(),
            consecutive_uses: core.selector.consecutive_uses(),
        }
    }
}

/// Serializable view of a brain, for debugging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrainSnapshot {
    pub state: Option<BossStateTag>,
    pub phase_number: usize,
    pub phase_name: Option<String>,
    pub transitioning: bool,
    pub escalated: bool,
    pub escalation_trigger: Option<EscalationTrigger>,
    pub poise: f32,
    pub poise_max: f32,
    pub poise_infinite: bool,
    pub elapsed_combat_seconds: f32,
    pub cooldowns: Vec<(Pattern, f32)>,
    pub combo_queue: Vec<Pattern>,
    pub last_pick: Option<Pattern>,
    pub consecutive_uses: u32,
}
