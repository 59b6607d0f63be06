//! Shared constants, configuration, randomness, time and the engine facade.

pub mod clock;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod rng;

pub use engine::{CombatTick, GameEngine};
pub use error::{ErrorSeverity, GameError, Result};
