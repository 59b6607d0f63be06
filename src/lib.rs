//! Idle Hero - rules engine for a single-character idle progression game.
//!
//! The crate computes what happens given a player and an action: real-time
//! combat, the level and job ladder, reward containers, star upgrades and idle
//! accrual. Presentation, persistence backends and transport live elsewhere;
//! [`GameEngine`] is the entry point for callers that own one player.

pub mod build_info;
pub mod character;
pub mod combat;
pub mod core;
pub mod enhancement;
pub mod idle;
pub mod items;
pub mod progression;
pub mod rewards;
pub mod simulator;

pub use crate::character::{Job, Player};
pub use crate::core::clock::{Clock, ManualClock, SystemClock};
pub use crate::core::config::GameConfig;
pub use crate::core::engine::{CombatTick, GameEngine};
pub use crate::core::error::{ErrorSeverity, GameError, Result};
pub use crate::core::rng::{RandomSource, RngSource, ScriptedSource, SeededSource};
