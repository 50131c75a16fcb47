use rand::{rngs::StdRng, seq::SliceRandom, RngCore, SeedableRng};

/// Source of randomness threaded through every scoring and boss call.
///
/// Every probabilistic effect draws through this trait in a fixed order, so a
/// seeded source (or a scripted one in tests) reproduces the same outcome.
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// `true` with probability `1 / odds`. Zero odds never succeed.
    fn one_in(&mut self, odds: u32) -> bool {
        if odds == 0 {
            return false;
        }
        self.next_u64() % odds as u64 == 0
    }

    /// Uniform index in `0..len`, or `None` for an empty range.
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.next_u64() % len as u64) as usize)
    }

    /// Uniform integer in `min..=max`.
    fn range_inclusive(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        let span = (max - min) as u64;
        min + (self.next_u64() % (span + 1)) as i64
    }
}

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

impl RandomSource for RngState {
    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

/// Fisher-Yates over any [`RandomSource`], used where the caller only holds
/// the trait object.
pub fn shuffle_with<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = (rng.next_u64() % (i as u64 + 1)) as usize;
        items.swap(i, j);
    }
}
