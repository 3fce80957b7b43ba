//! Core domain: state definitions for the fight flow.

use bevy::prelude::*;

#[derive(States, Debug, Hash, Eq, PartialEq, Clone, Default)]
pub enum FightState {
    #[default]
    Fighting,
    /// The boss is dead; the world keeps running but nothing restarts it
    Over,
}
