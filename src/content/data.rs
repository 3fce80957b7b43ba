//! Data definitions for RON content files.
//!
//! These structs mirror the structure in assets/data/*.ron and are used
//! for deserialization. The ContentRegistry provides lookup by id.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::brain::{AnimationCue, BossConfig, Pattern};

// ============================================================================
// Common wrapper for RON files with schema_version and items
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

// ============================================================================
// Bosses (bosses.ron)
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct BossDef {
    pub id: String,
    pub name: String,
    pub max_health: f32,
    /// Decision-core tuning; omitted fields fall back to defaults
    #[serde(default)]
    pub brain: BossConfig,
    #[serde(default)]
    pub animation_seconds: AnimationTimings,
}

/// How long the sandbox animation driver plays each cue, in seconds at
/// playback speed 1.0.
#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct AnimationTimings {
    pub melee_attack: f32,
    pub charge: f32,
    pub ranged_volley: f32,
    pub area_breath: f32,
    pub summon: f32,
    pub hit_reaction: f32,
    pub phase_transition: f32,
    pub death: f32,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            melee_attack: 0.8,
            charge: 1.2,
            ranged_volley: 1.0,
            area_breath: 1.6,
            summon: 1.5,
            hit_reaction: 0.6,
            phase_transition: 2.0,
            death: 2.5,
        }
    }
}

impl AnimationTimings {
    pub fn seconds_for(&self, cue: AnimationCue) -> f32 {
        match cue {
            AnimationCue::Pattern(pattern) => match pattern {
                Pattern::MeleeAttack => self.melee_attack,
                Pattern::Charge => self.charge,
                Pattern::RangedVolley => self.ranged_volley,
                Pattern::AreaBreath => self.area_breath,
                Pattern::Summon => self.summon,
                Pattern::Idle => 0.0,
            },
            AnimationCue::HitReaction => self.hit_reaction,
            AnimationCue::PhaseTransition => self.phase_transition,
            AnimationCue::Death => self.death,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> {
        [
            ("melee_attack", self.melee_attack),
            ("charge", self.charge),
            ("ranged_volley", self.ranged_volley),
            ("area_breath", self.area_breath),
            ("summon", self.summon),
            ("hit_reaction", self.hit_reaction),
            ("phase_transition", self.phase_transition),
            ("death", self.death),
        ]
        .into_iter()
    }
}
