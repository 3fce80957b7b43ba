//! Loader for RON content files at startup.

use bevy::prelude::*;
use ron::Options;
use std::fs;
use std::path::Path;

use super::data::*;
use super::registry::ContentRegistry;

/// File name of the boss definitions under the data directory
pub const BOSSES_FILE: &str = "bosses.ron";

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for ContentLoadError {}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse RON text containing a DataFile<T> wrapper. `file` only labels errors.
fn parse_data_file<T>(contents: &str, file: &str) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let data: DataFile<T> = ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })?;

    Ok(data.items)
}

/// Load a RON file containing a DataFile<T> wrapper.
fn load_data_file<T>(path: &Path) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: file_name.clone(),
        message: format!("IO error: {}", e),
    })?;

    parse_data_file(&contents, &file_name)
}

pub fn parse_boss_definitions(contents: &str) -> Result<Vec<BossDef>, ContentLoadError> {
    parse_data_file(contents, BOSSES_FILE)
}

pub fn load_boss_definitions(path: &Path) -> Result<Vec<BossDef>, ContentLoadError> {
    load_data_file(path)
}

/// Load all content from assets/data/*.ron into a ContentRegistry.
/// Returns errors for any files that fail to load.
pub fn load_all_content(base_path: &Path) -> Result<ContentRegistry, Vec<ContentLoadError>> {
    let mut registry = ContentRegistry::default();
    let mut errors = Vec::new();

    match load_boss_definitions(&base_path.join(BOSSES_FILE)) {
        Ok(bosses) => {
            for boss in bosses {
                if registry.bosses.contains_key(&boss.id) {
                    warn!("Duplicate boss id '{}', keeping the last definition", boss.id);
                }
                registry.bosses.insert(boss.id.clone(), boss);
            }
        }
        Err(e) => errors.push(e),
    }

    if errors.is_empty() {
        Ok(registry)
    } else {
        Err(errors)
    }
}
