//! Combat domain: systems that drive boss brains.

pub(crate) mod boss;

pub(crate) use boss::{
    advance_boss_animations, apply_boss_movement, dispatch_boss_commands, log_boss_milestones,
    update_boss_brains,
};
