//! Combat domain: tuning resources.

use bevy::prelude::*;

use crate::brain::Pattern;

/// Numbers the sandbox uses to turn brain intents into world effects.
#[derive(Resource, Debug, Clone)]
pub struct CombatTuning {
    /// World units are this many pixels
    pub pixels_per_unit: f32,
    /// Damage of each pattern before the boss's multiplier
    pub melee_damage: f32,
    pub charge_damage: f32,
    pub ranged_damage: f32,
    pub breath_damage: f32,
    /// How far each attack reaches, in world units
    pub melee_reach: f32,
    pub charge_reach: f32,
    pub ranged_reach: f32,
    pub breath_reach: f32,
    /// Allies spawned per summon
    pub summon_count: u32,
    pub ally_health: f32,
    /// Damage dealt to the boss by the hit key
    pub hit_damage: f32,
    pub hit_poise_damage: f32,
    /// Target movement speed in world units per second
    pub target_speed: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            pixels_per_unit: 32.0,
            melee_damage: 12.0,
            charge_damage: 18.0,
            ranged_damage: 8.0,
            breath_damage: 15.0,
            melee_reach: 3.0,
            charge_reach: 3.5,
            ranged_reach: 20.0,
            breath_reach: 5.0,
            summon_count: 2,
            ally_health: 30.0,
            hit_damage: 60.0,
            hit_poise_damage: 25.0,
            target_speed: 6.0,
        }
    }
}

impl CombatTuning {
    /// Base damage and reach of `pattern`; `None` for patterns that deal no
    /// direct damage.
    pub fn strike(&self, pattern: Pattern) -> Option<(f32, f32)> {
        match pattern {
            Pattern::MeleeAttack => Some((self.melee_damage, self.melee_reach)),
            Pattern::Charge => Some((self.charge_damage, self.charge_reach)),
            Pattern::RangedVolley => Some((self.ranged_damage, self.ranged_reach)),
            Pattern::AreaBreath => Some((self.breath_damage, self.breath_reach)),
            Pattern::Summon | Pattern::Idle => None,
        }
    }

    /// Allies one summon may add without pushing the boss past `cap`
    pub fn summons_allowed(&self, alive: u32, cap: u32) -> u32 {
        self.summon_count.min(cap.saturating_sub(alive))
    }

    pub fn to_units(&self, pixels: Vec2) -> Vec2 {
        pixels / self.pixels_per_unit
    }

    pub fn to_pixels(&self, units: Vec2) -> Vec2 {
        units * self.pixels_per_unit
    }
}
