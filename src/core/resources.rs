//! Core domain: shared resources for fight configuration and pausing.

use bevy::prelude::*;
use rand::Rng;
use std::collections::HashSet;

/// Resource tracking if gameplay should be paused.
/// Gameplay is paused if any source is active.
#[derive(Resource, Debug, Default)]
pub struct GameplayPaused {
    pub sources: HashSet<String>,
}

impl GameplayPaused {
    pub fn is_paused(&self) -> bool {
        !self.sources.is_empty()
    }

    pub fn pause(&mut self, source: impl Into<String>) {
        self.sources.insert(source.into());
    }

    pub fn unpause(&mut self, source: impl Into<String>) {
        self.sources.remove(&source.into());
    }

    /// Flip `source` and return whether it is now active
    pub fn toggle(&mut self, source: impl Into<String>) -> bool {
        let source = source.into();
        if self.sources.remove(&source) {
            false
        } else {
            self.sources.insert(source);
            true
        }
    }
}

/// Run condition: returns true only when gameplay is not paused
pub fn gameplay_active(paused: Res<GameplayPaused>) -> bool {
    !paused.is_paused()
}

/// Resource tracking scripted holds on the combat clock (cutscenes, dialogue).
/// Bosses keep acting, but their escalation timeout does not advance while
/// any hold is active.
#[derive(Resource, Debug, Default)]
pub struct CombatClockHold {
    pub sources: HashSet<String>,
}

impl CombatClockHold {
    pub fn is_held(&self) -> bool {
        !self.sources.is_empty()
    }

    pub fn hold(&mut self, source: impl Into<String>) {
        self.sources.insert(source.into());
    }

    pub fn release(&mut self, source: impl Into<String>) {
        self.sources.remove(&source.into());
    }
}

#[derive(Resource, Debug)]
pub struct FightConfig {
    /// Seed for every boss brain spawned in this fight
    pub seed: u64,
    /// Boss definition to spawn; the first loaded boss when unset
    pub boss_id: Option<String>,
}

impl Default for FightConfig {
    fn default() -> Self {
        Self {
            seed: rand::rng().random(),
            boss_id: None,
        }
    }
}

impl FightConfig {
    /// Read `BOSS_SEED` and `BOSS_ID` overrides from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(seed) = std::env::var("BOSS_SEED") {
            match seed.parse() {
                Ok(seed) => config.seed = seed,
                Err(e) => warn!("Ignoring BOSS_SEED '{}': {}", seed, e),
            }
        }
        if let Ok(id) = std::env::var("BOSS_ID") {
            config.boss_id = Some(id);
        }
        config
    }
}
