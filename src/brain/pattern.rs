//! Brain domain: the closed set of boss patterns and their per-pattern tuning.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A discrete boss action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, Reflect,
)]
pub enum Pattern {
    MeleeAttack,
    Charge,
    RangedVolley,
    AreaBreath,
    Summon,
    Idle,
}

impl Pattern {
    /// Every pattern the selector may pick, in candidate order.
    pub const ACTIONS: [Pattern; 5] = [
        Pattern::MeleeAttack,
        Pattern::Charge,
        Pattern::RangedVolley,
        Pattern::AreaBreath,
        Pattern::Summon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pattern::MeleeAttack => "melee_attack",
            Pattern::Charge => "charge",
            Pattern::RangedVolley => "ranged_volley",
            Pattern::AreaBreath => "area_breath",
            Pattern::Summon => "summon",
            Pattern::Idle => "idle",
        }
    }

    /// Remaining steps queued after this pattern when it opens a combo.
    ///
    /// The opener itself is not part of the tail; it has already been returned
    /// by the weighted draw.
    pub fn combo_tail(self) -> &'static [Pattern] {
        match self {
            Pattern::MeleeAttack => &[Pattern::MeleeAttack, Pattern::MeleeAttack],
            Pattern::Charge => &[Pattern::MeleeAttack],
            Pattern::AreaBreath => &[Pattern::RangedVolley],
            Pattern::RangedVolley | Pattern::Summon | Pattern::Idle => &[],
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-pattern selection tuning
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct PatternTuning {
    /// Cooldown in seconds before phase/escalation scaling
    pub base_cooldown: f32,
    /// Weight at the ideal engagement distance
    pub base_weight: f32,
    /// Distance at which the utility factor peaks
    pub ideal_distance: f32,
    /// Distance from the ideal over which the factor falls to its floor
    pub falloff: f32,
}

impl Default for PatternTuning {
    fn default() -> Self {
        Self {
            base_cooldown: 2.0,
            base_weight: 1.0,
            ideal_distance: 0.0,
            falloff: 10.0,
        }
    }
}

impl PatternTuning {
    pub const fn new(base_cooldown: f32, base_weight: f32, ideal_distance: f32, falloff: f32) -> Self {
        Self {
            base_cooldown,
            base_weight,
            ideal_distance,
            falloff,
        }
    }

    /// Utility of this pattern at `distance`: the base weight scaled by a
    /// triangular factor centred on `ideal_distance`, floored at `min_fraction`.
    pub fn weight_at(&self, distance: f32, min_fraction: f32) -> f32 {
        let floor = min_fraction.clamp(0.0, 1.0);
        let factor = if self.falloff > 0.0 {
            1.0 - (distance - self.ideal_distance).abs() / self.falloff
        } else {
            1.0
        };
        self.base_weight.max(0.0) * factor.clamp(floor, 1.0)
    }
}

/// Tuning for all selectable patterns
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct PatternTable {
    pub melee_attack: PatternTuning,
    pub charge: PatternTuning,
    pub ranged_volley: PatternTuning,
    pub area_breath: PatternTuning,
    pub summon: PatternTuning,
}

impl Default for PatternTable {
    fn default() -> Self {
        Self {
            melee_attack: PatternTuning::new(1.5, 10.0, 1.5, 4.0),
            charge: PatternTuning::new(6.0, 6.0, 7.0, 6.0),
            ranged_volley: PatternTuning::new(4.0, 5.0, 12.0, 10.0),
            area_breath: PatternTuning::new(8.0, 7.0, 3.0, 5.0),
            summon: PatternTuning::new(20.0, 4.0, 0.0, 0.0),
        }
    }
}

impl PatternTable {
    /// Tuning for `pattern`; `Idle` has no tuning.
    pub fn get(&self, pattern: Pattern) -> Option<&PatternTuning> {
        match pattern {
            Pattern::MeleeAttack => Some(&self.melee_attack),
            Pattern::Charge => Some(&self.charge),
            Pattern::RangedVolley => Some(&self.ranged_volley),
            Pattern::AreaBreath => Some(&self.area_breath),
            Pattern::Summon => Some(&self.summon),
            Pattern::Idle => None,
        }
    }

    pub fn base_cooldown(&self, pattern: Pattern) -> f32 {
        self.get(pattern).map_or(0.0, |t| t.base_cooldown)
    }
}
