//! Item system: equipment instances, stackable items and equipment generation.

pub mod generation;
pub mod types;

pub use generation::*;
pub use types::*;
