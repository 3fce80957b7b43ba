//! ContentRegistry resource providing HashMap lookups for all loaded content.

use bevy::prelude::*;
use std::collections::HashMap;

use super::data::*;

/// Central registry for all loaded content.
/// Provides O(1) lookup by id for any content type.
#[derive(Resource, Default)]
pub struct ContentRegistry {
    pub bosses: HashMap<String, BossDef>,
}

impl ContentRegistry {
    /// Returns a summary of loaded content counts for logging.
    pub fn summary(&self) -> String {
        let mut ids: Vec<&str> = self.bosses.keys().map(String::as_str).collect();
        ids.sort_unstable();
        format!(
            "ContentRegistry loaded:\n\
             - Bosses: {} [{}]",
            self.bosses.len(),
            ids.join(", ")
        )
    }

    pub fn boss(&self, id: &str) -> Option<&BossDef> {
        self.bosses.get(id)
    }

    /// First boss by id order, used when no boss id is configured.
    pub fn first_boss(&self) -> Option<&BossDef> {
        self.bosses
            .iter()
            .min_by(|a, b| a.0.cmp(b.0))
            .map(|(_, def)| def)
    }

    /// Returns total count of all loaded items.
    pub fn total_count(&self) -> usize {
        self.bosses.len()
    }
}
