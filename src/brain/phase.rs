//! Brain domain: HP-threshold phases and forward-only phase tracking.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::brain::pattern::Pattern;

/// Optional patterns a phase can switch on or off. Melee is always enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct EnabledPatterns {
    pub charge: bool,
    pub ranged_volley: bool,
    pub area_breath: bool,
    pub summon: bool,
}

impl Default for EnabledPatterns {
    fn default() -> Self {
        Self::all()
    }
}

impl EnabledPatterns {
    pub const fn all() -> Self {
        Self {
            charge: true,
            ranged_volley: true,
            area_breath: true,
            summon: true,
        }
    }

    pub const fn melee_only() -> Self {
        Self {
            charge: false,
            ranged_volley: false,
            area_breath: false,
            summon: false,
        }
    }

    pub fn allows(&self, pattern: Pattern) -> bool {
        match pattern {
            Pattern::MeleeAttack | Pattern::Idle => true,
            Pattern::Charge => self.charge,
            Pattern::RangedVolley => self.ranged_volley,
            Pattern::AreaBreath => self.area_breath,
            Pattern::Summon => self.summon,
        }
    }
}

/// One stage of the fight
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct PhaseDescriptor {
    pub name: String,
    /// Fraction of max health at or under which this phase applies
    pub hp_threshold: f32,
    pub damage_multiplier: f32,
    pub attack_speed_multiplier: f32,
    pub cooldown_multiplier: f32,
    pub enabled: EnabledPatterns,
    /// Whether entering this phase plays a transition animation
    pub plays_transition: bool,
}

impl Default for PhaseDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            hp_threshold: 1.0,
            damage_multiplier: 1.0,
            attack_speed_multiplier: 1.0,
            cooldown_multiplier: 1.0,
            enabled: EnabledPatterns::all(),
            plays_transition: true,
        }
    }
}

impl PhaseDescriptor {
    pub fn new(name: impl Into<String>, hp_threshold: f32) -> Self {
        Self {
            name: name.into(),
            hp_threshold,
            ..default()
        }
    }
}

/// Ordered phases, highest threshold first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseTable {
    phases: Vec<PhaseDescriptor>,
}

impl PhaseTable {
    pub fn new(mut phases: Vec<PhaseDescriptor>) -> Self {
        phases.sort_by(|a, b| b.hp_threshold.total_cmp(&a.hp_threshold));
        Self { phases }
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn descriptor(&self, index: usize) -> Option<&PhaseDescriptor> {
        self.phases.get(index)
    }

    /// Scan from the lowest threshold upward and return the first phase whose
    /// threshold is at or above `hp_ratio`. Falls back to phase 0.
    pub fn resolve_phase_index(&self, hp_ratio: f32) -> usize {
        self.phases
            .iter()
            .enumerate()
            .rev()
            .find(|(_, phase)| phase.hp_threshold >= hp_ratio)
            .map_or(0, |(index, _)| index)
    }

    /// Next phase index, only if it moves the fight forward.
    pub fn evaluate(&self, hp_ratio: f32, state: &PhaseState) -> Option<usize> {
        if state.transitioning {
            return None;
        }
        let resolved = self.resolve_phase_index(hp_ratio);
        (resolved > state.index).then_some(resolved)
    }

    pub fn damage_multiplier(&self, index: usize) -> f32 {
        self.descriptor(index).map_or(1.0, |p| p.damage_multiplier)
    }

    pub fn attack_speed_multiplier(&self, index: usize) -> f32 {
        self.descriptor(index).map_or(1.0, |p| p.attack_speed_multiplier)
    }

    pub fn cooldown_multiplier(&self, index: usize) -> f32 {
        self.descriptor(index).map_or(1.0, |p| p.cooldown_multiplier)
    }

    pub fn enabled_patterns(&self, index: usize) -> EnabledPatterns {
        self.descriptor(index).map_or(EnabledPatterns::all(), |p| p.enabled)
    }

    pub fn is_enabled(&self, index: usize, pattern: Pattern) -> bool {
        self.enabled_patterns(index).allows(pattern)
    }
}

/// Current phase index and the transition latch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseState {
    index: usize,
    transitioning: bool,
}

impl PhaseState {
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based phase number
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Move to `index` and latch the transition. Backward moves are ignored.
    pub fn begin_transition(&mut self, index: usize) -> bool {
        if index <= self.index {
            return false;
        }
        self.index = index;
        self.transitioning = true;
        true
    }

    pub fn complete_transition(&mut self) -> bool {
        std::mem::replace(&mut self.transitioning, false)
    }
}
