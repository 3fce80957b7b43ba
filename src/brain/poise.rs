//! Brain domain: super-armor meter that breaks once per depletion.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct PoiseConfig {
    pub max: f32,
    /// Poise restored per second once regeneration kicks in (0 disables it)
    pub regen_per_second: f32,
    /// Seconds without poise damage before regeneration starts
    pub regen_delay_seconds: f32,
}

impl Default for PoiseConfig {
    fn default() -> Self {
        Self {
            max: 100.0,
            regen_per_second: 0.0,
            regen_delay_seconds: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoiseTracker {
    current: f32,
    max: f32,
    infinite: bool,
    regen_per_second: f32,
    regen_delay: f32,
    since_damage: f32,
}

impl Default for PoiseTracker {
    fn default() -> Self {
        Self::new(&PoiseConfig::default())
    }
}

impl PoiseTracker {
    pub fn new(config: &PoiseConfig) -> Self {
        let max = if config.max.is_finite() { config.max.max(0.0) } else { 0.0 };
        Self {
            current: max,
            max,
            infinite: false,
            regen_per_second: config.regen_per_second.max(0.0),
            regen_delay: config.regen_delay_seconds.max(0.0),
            since_damage: 0.0,
        }
    }

    /// Apply stagger damage. Returns true on the hit that depletes poise.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.infinite || !(amount > 0.0) {
            return false;
        }
        let before = self.current;
        self.current = (self.current - amount).clamp(0.0, self.max);
        self.since_damage = 0.0;
        before > 0.0 && self.current <= 0.0
    }

    /// Restore poise by `amount`, or fully when `None`. Returns the new value.
    pub fn recover(&mut self, amount: Option<f32>) -> f32 {
        self.current = match amount {
            Some(amount) if amount > 0.0 => (self.current + amount).min(self.max),
            Some(_) => self.current,
            None => self.max,
        };
        self.current
    }

    /// Passive regeneration, only while not broken. Returns the new value when
    /// anything was restored.
    pub fn regenerate(&mut self, delta: f32) -> Option<f32> {
        if !(delta > 0.0) {
            return None;
        }
        self.since_damage += delta;
        if self.regen_per_second <= 0.0
            || self.since_damage < self.regen_delay
            || self.current <= 0.0
            || self.current >= self.max
        {
            return None;
        }
        Some(self.recover(Some(self.regen_per_second * delta)))
    }

    /// Toggle immunity without touching the stored value.
    pub fn set_infinite(&mut self, infinite: bool) {
        self.infinite = infinite;
    }

    pub fn is_infinite(&self) -> bool {
        self.infinite
    }

    pub fn is_broken(&self) -> bool {
        !self.infinite && self.current <= 0.0
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn percent(&self) -> f32 {
        if self.max > 0.0 { self.current / self.max } else { 0.0 }
    }
}
