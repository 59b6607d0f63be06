//! Idle accrual scheduler: stamina regeneration and passive containers.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
