//! Boss AI decision core and the sandbox fight that exercises it.

pub mod brain;
pub mod combat;
pub mod content;
pub mod core;
#[cfg(feature = "dev-tools")]
pub mod debug;
