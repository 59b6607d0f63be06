//! Random outcome sources.
//!
//! Every weighted draw in the rules goes through [`RandomSource`], so the same
//! rules run against a local PRNG, a seeded (replayable) generator, or a script
//! of externally derived outcomes.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// Uniform draw in [0, 100).
    fn roll_percent(&mut self) -> f64;

    /// Uniform integer in [0, n). Returns 0 when `n` is 0.
    fn roll_below(&mut self, n: u32) -> u32;

    /// True with probability `chance_percent / 100`.
    fn chance(&mut self, chance_percent: f64) -> bool {
        self.roll_percent() < chance_percent
    }

    /// Picks an index from a weight table. Zero-weight entries are never chosen.
    /// Returns `None` if all weights are zero or the total overflows `u32`.
    fn pick_weighted(&mut self, weights: &[u32]) -> Option<usize> {
        let total = weight_total(weights.iter().copied()).filter(|&t| t > 0)?;
        let mut roll = self.roll_below(total);
        for (index, &weight) in weights.iter().enumerate() {
            if roll < weight {
                return Some(index);
            }
            roll -= weight;
        }
        None
    }
}

/// Sum of a weight table, or `None` if it does not fit in `u32`.
pub fn weight_total(weights: impl IntoIterator<Item = u32>) -> Option<u32> {
    weights
        .into_iter()
        .try_fold(0u32, |total, weight| total.checked_add(weight))
}

/// Adapter over any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn roll_percent(&mut self) -> f64 {
        self.0.gen_range(0.0..100.0)
    }

    fn roll_below(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.0.gen_range(0..n)
        }
    }
}

/// Reproducible source. Two sources built from the same seed produce the same
/// outcome sequence.
pub type SeededSource = RngSource<ChaCha8Rng>;

impl SeededSource {
    pub fn from_seed_u64(seed: u64) -> Self {
        RngSource(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Local thread generator.
pub fn thread_source() -> RngSource<rand::rngs::ThreadRng> {
    RngSource(rand::thread_rng())
}

/// Replays a fixed list of fractions in [0, 1), cycling when exhausted.
///
/// `roll_percent` yields `f * 100` and `roll_below(n)` yields `floor(f * n)`,
/// so a script entry of `0.0` forces the lowest outcome of any draw and `0.999`
/// the highest.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(script: Vec<f64>) -> Self {
        let script = if script.is_empty() { vec![0.0] } else { script };
        let script = script
            .into_iter()
            .map(|f| f.clamp(0.0, 0.999_999))
            .collect();
        Self { script, cursor: 0 }
    }

    /// Always returns the same fraction.
    pub fn always(fraction: f64) -> Self {
        Self::new(vec![fraction])
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }

    fn next_fraction(&mut self) -> f64 {
        let value = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        value
    }
}

impl RandomSource for ScriptedSource {
    fn roll_percent(&mut self) -> f64 {
        self.next_fraction() * 100.0
    }

    fn roll_below(&mut self, n: u32) -> u32 {
        let fraction = self.next_fraction();
        if n == 0 {
            return 0;
        }
        ((fraction * n as f64) as u32).min(n - 1)
    }
}
