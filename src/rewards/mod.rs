//! Reward containers and the weighted tables that open them.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
