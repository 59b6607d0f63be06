//! Game balance simulator for Monte Carlo analysis.
//!
//! Runs many seeded players through the engine to analyze:
//! - Stage progress and win rates against the stage table
//! - Reward kind shares and container tier-ups
//! - Star upgrade and job advancement success rates
//! - How often players stall at a job gate or run out of health

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::run_simulation;
