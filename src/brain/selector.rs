//! Brain domain: weighted pattern selection with cooldowns, combos, and
//! repetition decay.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::brain::ledger::{
    ComboQueue, CooldownLedger, DEFAULT_COMBO_MIN_PHASE, DEFAULT_COMBO_PROBABILITY,
    effective_cooldown,
};
use crate::brain::pattern::{Pattern, PatternTable};
use crate::brain::phase::{EnabledPatterns, PhaseDescriptor};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct SelectorTuning {
    pub melee_range: f32,
    /// Farthest distance a charge may start from
    pub charge_distance: f32,
    pub breath_range: f32,
    /// Farthest distance a ranged volley can reach
    pub ranged_range: f32,
    /// Health ratio at or under which summoning becomes available
    pub summon_health_threshold: f32,
    pub max_allies: u32,
    /// Lowest fraction of its base weight distance can push a pattern to
    pub min_weight_fraction: f32,
    pub combo_probability: f32,
    pub combo_min_phase: usize,
    /// Weight lost per consecutive repeat of the same pattern
    pub repetition_step: f32,
    pub repetition_floor: f32,
    pub patterns: PatternTable,
}

impl Default for SelectorTuning {
    fn default() -> Self {
        Self {
            melee_range: 2.0,
            charge_distance: 10.0,
            breath_range: 5.0,
            ranged_range: 20.0,
            summon_health_threshold: 0.5,
            max_allies: 3,
            min_weight_fraction: 0.1,
            combo_probability: DEFAULT_COMBO_PROBABILITY,
            combo_min_phase: DEFAULT_COMBO_MIN_PHASE,
            repetition_step: 0.3,
            repetition_floor: 0.3,
            patterns: PatternTable::default(),
        }
    }
}

/// Everything the selector reads about the current frame.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    pub distance: f32,
    pub health_ratio: f32,
    pub alive_allies: u32,
    /// Active phase, `None` when the boss has no phase data
    pub phase: Option<&'a PhaseDescriptor>,
    /// 1-based phase number
    pub phase_number: usize,
    /// Escalation cooldown multiplier (1.0 while not escalated)
    pub escalation_cooldown_multiplier: f32,
}

impl SelectionContext<'_> {
    fn enabled(&self) -> EnabledPatterns {
        self.phase.map_or(EnabledPatterns::all(), |p| p.enabled)
    }

    fn phase_cooldown_multiplier(&self) -> f32 {
        self.phase.map_or(1.0, |p| p.cooldown_multiplier)
    }
}

/// A pattern eligible this cycle, paired with its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternCandidate {
    pub pattern: Pattern,
    pub weight: f32,
}

/// Result of one selection call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub pattern: Pattern,
    /// Popped from the combo queue rather than drawn
    pub from_combo: bool,
    /// This pick opened a new combo
    pub combo_started: bool,
}

impl Selection {
    fn idle() -> Self {
        Self {
            pattern: Pattern::Idle,
            from_combo: false,
            combo_started: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternSelector {
    tuning: SelectorTuning,
    ledger: CooldownLedger,
    combo: ComboQueue,
    last_pick: Option<Pattern>,
    consecutive_uses: u32,
}

impl Default for PatternSelector {
    fn default() -> Self {
        Self::new(SelectorTuning::default())
    }
}

impl PatternSelector {
    pub fn new(tuning: SelectorTuning) -> Self {
        let ledger = CooldownLedger::new(&tuning.patterns);
        let combo = ComboQueue::new(tuning.combo_probability, tuning.combo_min_phase);
        Self {
            tuning,
            ledger,
            combo,
            last_pick: None,
            consecutive_uses: 0,
        }
    }

    pub fn tick(&mut self, delta: f32) {
        self.ledger.tick(delta);
    }

    /// Pick the next pattern.
    ///
    /// A pending combo step always wins. Otherwise candidates are weighted,
    /// one is drawn, a combo may start from it, its cooldown is consumed and
    /// repetition tracking updated. With no candidates the result is `Idle`
    /// and nothing is touched.
    pub fn select<R>(&mut self, ctx: &SelectionContext<'_>, rng: &mut R) -> Selection
    where
        R: Rng + ?Sized,
    {
        if self.combo.is_active() {
            if let Some(pattern) = self.combo.dequeue_next() {
                debug!("Combo continues with {}", pattern);
                return Selection {
                    pattern,
                    from_combo: true,
                    combo_started: false,
                };
            }
        }

        let candidates = self.candidates(ctx);
        let Some(winner) = pick_weighted(&candidates, &mut *rng) else {
            return Selection::idle();
        };

        let enabled = ctx.enabled();
        let combo_started = self.combo.try_start(
            winner,
            ctx.phase_number,
            |p| enabled.allows(p),
            &mut *rng,
        );

        let cooldown = effective_cooldown(
            self.tuning.patterns.base_cooldown(winner),
            ctx.phase_cooldown_multiplier(),
            ctx.escalation_cooldown_multiplier,
        );
        self.ledger.consume(winner, cooldown);

        if self.last_pick == Some(winner) {
            self.consecutive_uses = self.consecutive_uses.saturating_add(1);
        } else {
            self.last_pick = Some(winner);
            self.consecutive_uses = 1;
        }

        debug!(
            "Selected {} from {} candidates (cooldown {:.2}s, combo {})",
            winner,
            candidates.len(),
            cooldown,
            combo_started
        );

        Selection {
            pattern: winner,
            from_combo: false,
            combo_started,
        }
    }

    /// Eligible patterns with their weights after repetition decay, in
    /// candidate order.
    pub fn candidates(&self, ctx: &SelectionContext<'_>) -> Vec<PatternCandidate> {
        Pattern::ACTIONS
            .iter()
            .copied()
            .filter(|&pattern| self.is_eligible(pattern, ctx))
            .map(|pattern| PatternCandidate {
                pattern,
                weight: self.base_weight(pattern, ctx.distance) * self.repetition_factor(pattern),
            })
            .collect()
    }

    /// Cooldown, phase, and distance-band gates.
    pub fn is_eligible(&self, pattern: Pattern, ctx: &SelectionContext<'_>) -> bool {
        if pattern == Pattern::Idle || !self.ledger.is_ready(pattern) {
            return false;
        }
        if !ctx.enabled().allows(pattern) {
            return false;
        }

        let t = &self.tuning;
        let d = ctx.distance;
        match pattern {
            Pattern::MeleeAttack => d <= t.melee_range * 1.5,
            Pattern::Charge => d > t.melee_range && d <= t.charge_distance,
            Pattern::AreaBreath => d <= t.breath_range,
            Pattern::RangedVolley => d > t.melee_range && d <= t.ranged_range,
            Pattern::Summon => {
                ctx.health_ratio <= t.summon_health_threshold && ctx.alive_allies < t.max_allies
            }
            Pattern::Idle => false,
        }
    }

    /// Distance utility before repetition decay. Summon has a fixed weight.
    pub fn base_weight(&self, pattern: Pattern, distance: f32) -> f32 {
        let Some(tuning) = self.tuning.patterns.get(pattern) else {
            return 0.0;
        };
        match pattern {
            Pattern::Summon => tuning.base_weight.max(0.0),
            _ => tuning.weight_at(distance, self.tuning.min_weight_fraction),
        }
    }

    /// `max(floor, 1 - step * consecutive uses)` for the last pick, else 1.
    pub fn repetition_factor(&self, pattern: Pattern) -> f32 {
        if self.last_pick != Some(pattern) {
            return 1.0;
        }
        let decayed = 1.0 - self.tuning.repetition_step * self.consecutive_uses as f32;
        decayed.max(self.tuning.repetition_floor)
    }

    /// Phase break: every cooldown resets and any combo is dropped.
    pub fn on_phase_transition(&mut self) {
        self.ledger.reset_all();
        self.combo.cancel();
    }

    pub fn cancel_combo(&mut self) {
        self.combo.cancel();
    }

    pub fn combo_pending(&self) -> bool {
        self.combo.is_active()
    }

    pub fn ledger(&self) -> &CooldownLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut CooldownLedger {
        &mut self.ledger
    }

    pub fn combo(&self) -> &ComboQueue {
        &self.combo
    }

    pub fn combo_mut(&mut self) -> &mut ComboQueue {
        &mut self.combo
    }

    pub fn last_pick(&self) -> Option<Pattern> {
        self.last_pick
    }

    pub fn consecutive_uses(&self) -> u32 {
        self.consecutive_uses
    }

    pub fn tuning(&self) -> &SelectorTuning {
        &self.tuning
    }
}

/// Roulette-wheel draw over `candidates`.
///
/// The first candidate whose cumulative weight reaches the draw wins; the last
/// candidate absorbs any floating-point drift.
pub fn pick_weighted<R>(candidates: &[PatternCandidate], rng: &mut R) -> Option<Pattern>
where
    R: Rng + ?Sized,
{
    let last = candidates.last()?;
    let total: f32 = candidates.iter().map(|c| c.weight.max(0.0)).sum();
    if !(total > 0.0) || !total.is_finite() {
        return Some(last.pattern);
    }

    let roll = rng.random::<f32>() * total;
    let mut cumulative = 0.0;
    for candidate in candidates {
        cumulative += candidate.weight.max(0.0);
        if cumulative >= roll {
            return Some(candidate.pattern);
        }
    }

    Some(last.pattern)
}
