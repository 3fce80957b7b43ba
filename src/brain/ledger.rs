//! Brain domain: per-pattern cooldown bookkeeping and the combo queue.

use std::collections::{BTreeMap, VecDeque};

use rand::Rng;

use crate::brain::pattern::{Pattern, PatternTable};

/// Chance that an eligible opener starts a combo
pub const DEFAULT_COMBO_PROBABILITY: f32 = 0.3;
/// First phase number (1-based) in which combos may start
pub const DEFAULT_COMBO_MIN_PHASE: usize = 3;

/// Remaining cooldown per pattern, in seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CooldownLedger {
    remaining: BTreeMap<Pattern, f32>,
}

impl CooldownLedger {
    /// Melee starts ready, every other pattern starts at half its base cooldown.
    pub fn new(patterns: &PatternTable) -> Self {
        let remaining = Pattern::ACTIONS
            .iter()
            .map(|&pattern| {
                let start = match pattern {
                    Pattern::MeleeAttack => 0.0,
                    _ => patterns.base_cooldown(pattern).max(0.0) * 0.5,
                };
                (pattern, start)
            })
            .collect();
        Self { remaining }
    }

    /// Advance every cooldown by `delta` seconds, flooring at zero.
    pub fn tick(&mut self, delta: f32) {
        if !(delta > 0.0) {
            return;
        }
        for remaining in self.remaining.values_mut() {
            *remaining = (*remaining - delta).max(0.0);
        }
    }

    /// Untracked patterns are always ready.
    pub fn is_ready(&self, pattern: Pattern) -> bool {
        self.remaining.get(&pattern).is_none_or(|r| *r <= 0.0)
    }

    pub fn remaining(&self, pattern: Pattern) -> f32 {
        self.remaining.get(&pattern).copied().unwrap_or(0.0)
    }

    /// Start `pattern`'s cooldown. Non-finite or negative values clamp to zero.
    pub fn consume(&mut self, pattern: Pattern, effective_cooldown: f32) {
        let value = if effective_cooldown.is_finite() {
            effective_cooldown.max(0.0)
        } else {
            0.0
        };
        self.remaining.insert(pattern, value);
    }

    /// Make every tracked pattern immediately available.
    pub fn reset_all(&mut self) {
        for remaining in self.remaining.values_mut() {
            *remaining = 0.0;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pattern, f32)> + '_ {
        self.remaining.iter().map(|(p, r)| (*p, *r))
    }
}

/// Base cooldown scaled by the phase and escalation multipliers.
pub fn effective_cooldown(base: f32, phase_multiplier: f32, escalation_multiplier: f32) -> f32 {
    (base * phase_multiplier * escalation_multiplier).max(0.0)
}

/// Patterns queued to fire back-to-back after the current one.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboQueue {
    queue: VecDeque<Pattern>,
    in_combo: bool,
    probability: f32,
    min_phase_number: usize,
}

impl Default for ComboQueue {
    fn default() -> Self {
        Self::new(DEFAULT_COMBO_PROBABILITY, DEFAULT_COMBO_MIN_PHASE)
    }
}

impl ComboQueue {
    pub fn new(probability: f32, min_phase_number: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            in_combo: false,
            probability: probability.clamp(0.0, 1.0),
            min_phase_number,
        }
    }

    /// Roll for a combo opened by `opener`.
    ///
    /// Below the minimum phase number no random value is drawn. Otherwise one
    /// value is drawn; on success the opener's tail is queued, provided every
    /// step in it is enabled for the current phase.
    pub fn try_start<R>(
        &mut self,
        opener: Pattern,
        phase_number: usize,
        is_enabled: impl Fn(Pattern) -> bool,
        rng: &mut R,
    ) -> bool
    where
        R: Rng + ?Sized,
    {
        if phase_number < self.min_phase_number {
            return false;
        }

        let roll: f32 = rng.random();
        if roll >= self.probability {
            return false;
        }

        let tail = opener.combo_tail();
        if tail.is_empty() || !tail.iter().all(|&step| is_enabled(step)) {
            return false;
        }

        self.queue.clear();
        self.queue.extend(tail.iter().copied());
        self.in_combo = true;
        true
    }

    /// Pop the next queued step. Clears the combo flag once the queue drains.
    pub fn dequeue_next(&mut self) -> Option<Pattern> {
        if !self.in_combo {
            return None;
        }
        let next = self.queue.pop_front();
        if self.queue.is_empty() {
            self.in_combo = false;
        }
        next
    }

    pub fn cancel(&mut self) {
        self.queue.clear();
        self.in_combo = false;
    }

    pub fn is_active(&self) -> bool {
        self.in_combo && !self.queue.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = Pattern> + '_ {
        self.queue.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
