//! Content domain: boss definitions loaded from RON at startup.

mod data;
mod loader;
mod registry;
#[cfg(test)]
mod tests;
mod validation;

pub use data::{AnimationTimings, BossDef, DataFile};
pub use loader::{
    BOSSES_FILE, ContentLoadError, load_all_content, load_boss_definitions,
    parse_boss_definitions,
};
pub use registry::ContentRegistry;
pub use validation::{ValidationError, validate_content};

use bevy::prelude::*;
use std::path::PathBuf;

/// Directory the content files are read from
#[derive(Resource, Debug, Clone)]
pub struct ContentPath(pub PathBuf);

impl Default for ContentPath {
    fn default() -> Self {
        Self(PathBuf::from("assets/data"))
    }
}

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContentPath>()
            .register_type::<BossDef>()
            .register_type::<AnimationTimings>()
            .add_systems(PreStartup, load_content);
    }
}

/// Load every content file and insert the registry. Load failures leave an
/// empty registry so the fight falls back to default tuning.
fn load_content(mut commands: Commands, path: Res<ContentPath>) {
    let registry = match load_all_content(&path.0) {
        Ok(registry) => registry,
        Err(errors) => {
            for e in &errors {
                error!("{}", e);
            }
            ContentRegistry::default()
        }
    };

    info!("{}", registry.summary());

    let problems = validate_content(&registry);
    for problem in &problems {
        warn!("{}", problem);
    }
    if !problems.is_empty() {
        warn!("Content has {} validation problem(s)", problems.len());
    }

    commands.insert_resource(registry);
}
