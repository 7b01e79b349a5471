//! Deterministic seeding for environment generation and solver initialisation.
//!
//! - RngStream: the reproducible PRNG used everywhere randomness is injected (ChaCha8)
//! - SeedSequence: expands one root seed into independent sub-seeds, so a batch
//!   of environments can be derived from a single configured seed

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Default RNG stream used across the crate.
pub type RngStream = ChaCha8Rng;

/// SplitMix64-based expansion of a 64-bit seed into a sequence of sub-seeds.
#[derive(Clone, Debug)]
pub struct SeedSequence {
    state: u128,
}

impl SeedSequence {
    pub fn new(seed: u64) -> Self {
        Self { state: (seed as u128) ^ 0x9E3779B97F4A7C15u128 }
    }

    /// Next sub-seed of the sequence.
    pub fn next_subseed(&mut self) -> u64 {
        let mut z = (self.state as u64).wrapping_add(0x9E3779B97F4A7C15);
        self.state = (self.state ^ (z as u128)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    /// An RNG stream seeded from the next sub-seed.
    pub fn next_rng(&mut self) -> RngStream {
        RngStream::seed_from_u64(self.next_subseed())
    }
}

impl Iterator for SeedSequence {
    type Item = u64;

    fn next(&mut self) -> Option<u64> { Some(self.next_subseed()) }
}

/// `n` sub-seeds derived from `seed`.
pub fn split_n(seed: u64, n: usize) -> Vec<u64> {
    SeedSequence::new(seed).take(n).collect()
}

pub fn rng_from_seed(seed: u64) -> RngStream {
    RngStream::seed_from_u64(seed)
}
