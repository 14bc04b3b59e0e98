//! Deterministic simulation RNG wrapper.
//!
//! Randomness enters the simulation in exactly one place: population
//! utilities (random free-cell placement, age sampling).  Wrapping `SmallRng`
//! behind an explicitly seeded handle keeps runs reproducible — the same
//! seed always places the same crowd — and keeps ambient global RNG state
//! out of the library.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seeded simulation RNG.
///
/// Create one per run and pass it into the operations that draw from it.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
