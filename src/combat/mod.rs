//! Combat sessions, damage and opponent sources.

pub mod logic;
pub mod opponents;
pub mod types;

pub use logic::*;
pub use opponents::*;
pub use types::*;
