use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses the hidden number for a new round.
pub trait TargetSource {
    /// Returns a value in `1..=max_value`.
    fn pick(&mut self, max_value: u32) -> u32;
}

/// Uniform draw from a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomTarget<R: Rng = StdRng> {
    rng: R,
}

impl RandomTarget<StdRng> {
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl<R: Rng> TargetSource for RandomTarget<R> {
    fn pick(&mut self, max_value: u32) -> u32 {
        self.rng.random_range(1..=max_value.max(1))
    }
}

/// Always the same number, clamped into range.
#[derive(Debug, Clone, Copy)]
pub struct FixedTarget(pub u32);

impl TargetSource for FixedTarget {
    fn pick(&mut self, max_value: u32) -> u32 {
        self.0.clamp(1, max_value.max(1))
    }
}
