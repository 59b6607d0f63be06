//! Simulation configuration.

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulated players
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random). Run `i` uses `seed + i`.
    pub seed: Option<u64>,

    /// Encounters each player fights before the run ends
    pub max_encounters: u32,

    /// Victories on a stage before moving to the next one
    pub stage_advance_wins: u32,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per-run lines)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            max_encounters: 500,
            stage_advance_wins: 3,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Small, seeded config for smoke checks.
    pub fn quick(seed: u64) -> Self {
        Self {
            num_runs: 20,
            seed: Some(seed),
            max_encounters: 100,
            ..Default::default()
        }
    }
}
