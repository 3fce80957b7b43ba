//! Brain domain: one-way enrage latch with independent triggers.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct EscalationConfig {
    /// Health ratio at or under which the boss enrages
    pub health_threshold: f32,
    /// Combat seconds after which the boss enrages
    pub timeout_seconds: f32,
    pub damage_multiplier: f32,
    pub speed_multiplier: f32,
    /// Applied to every consumed cooldown once escalated
    pub cooldown_multiplier: f32,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            health_threshold: 0.3,
            timeout_seconds: 120.0,
            damage_multiplier: 1.5,
            speed_multiplier: 1.3,
            cooldown_multiplier: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EscalationTrigger {
    LowHealth,
    Timeout,
    AllyWipe,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EscalationMonitor {
    config: EscalationConfig,
    escalated: bool,
    by_low_health: bool,
    by_timeout: bool,
    by_ally_wipe: bool,
    trigger: Option<EscalationTrigger>,
    damage_multiplier: f32,
    speed_multiplier: f32,
    cooldown_multiplier: f32,
}

impl Default for EscalationMonitor {
    fn default() -> Self {
        Self::new(EscalationConfig::default())
    }
}

impl EscalationMonitor {
    pub fn new(config: EscalationConfig) -> Self {
        Self {
            config,
            escalated: false,
            by_low_health: false,
            by_timeout: false,
            by_ally_wipe: false,
            trigger: None,
            damage_multiplier: 1.0,
            speed_multiplier: 1.0,
            cooldown_multiplier: 1.0,
        }
    }

    /// Check every trigger in order. Each trigger latches on its own; only the
    /// first satisfied one escalates, and escalation happens at most once.
    ///
    /// Returns the trigger that escalated the boss on this call.
    pub fn evaluate(
        &mut self,
        hp_ratio: f32,
        elapsed_combat_seconds: f32,
        all_allies_dead: bool,
    ) -> Option<EscalationTrigger> {
        let mut fired = None;

        if !self.by_low_health && hp_ratio <= self.config.health_threshold {
            self.by_low_health = true;
            fired = fired.or(Some(EscalationTrigger::LowHealth));
        }
        if !self.by_timeout && elapsed_combat_seconds >= self.config.timeout_seconds {
            self.by_timeout = true;
            fired = fired.or(Some(EscalationTrigger::Timeout));
        }
        if !self.by_ally_wipe && all_allies_dead {
            self.by_ally_wipe = true;
            fired = fired.or(Some(EscalationTrigger::AllyWipe));
        }

        let trigger = fired?;
        if self.trigger.is_some() {
            return None;
        }
        self.escalate(trigger);
        Some(trigger)
    }

    fn escalate(&mut self, trigger: EscalationTrigger) {
        self.escalated = true;
        self.trigger = Some(trigger);
        self.damage_multiplier = self.config.damage_multiplier;
        self.speed_multiplier = self.config.speed_multiplier;
        self.cooldown_multiplier = self.config.cooldown_multiplier;
        info!(
            "Boss escalated by {:?} (damage x{:.2}, speed x{:.2})",
            trigger, self.damage_multiplier, self.speed_multiplier
        );
    }

    /// Scripted exit from escalation. Triggers stay latched, so normal flow
    /// never escalates again afterwards.
    pub fn end_escalation(&mut self) {
        if !self.escalated {
            return;
        }
        self.escalated = false;
        self.damage_multiplier = 1.0;
        self.speed_multiplier = 1.0;
        self.cooldown_multiplier = 1.0;
        info!("Boss escalation ended by script");
    }

    pub fn is_escalated(&self) -> bool {
        self.escalated
    }

    /// The trigger that first escalated the boss
    pub fn trigger(&self) -> Option<EscalationTrigger> {
        self.trigger
    }

    pub fn is_latched(&self, trigger: EscalationTrigger) -> bool {
        match trigger {
            EscalationTrigger::LowHealth => self.by_low_health,
            EscalationTrigger::Timeout => self.by_timeout,
            EscalationTrigger::AllyWipe => self.by_ally_wipe,
        }
    }

    pub fn damage_multiplier(&self) -> f32 {
        if self.escalated { self.damage_multiplier } else { 1.0 }
    }

    pub fn speed_multiplier(&self) -> f32 {
        if self.escalated { self.speed_multiplier } else { 1.0 }
    }

    pub fn cooldown_multiplier(&self) -> f32 {
        if self.escalated { self.cooldown_multiplier } else { 1.0 }
    }

    pub fn config(&self) -> &EscalationConfig {
        &self.config
    }
}
