//! Cosmetic randomness: online head-counts and pulse animation offsets.
//!
//! Nothing in the timing engines depends on this. Pass a seed to get
//! reproducible values in tests and screenshots.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// Upper bound for a map pulse's animation start offset.
pub const MAX_PULSE_OFFSET_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct Ambience {
    rng: Mcg128Xsl64,
}

impl Ambience {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self { rng }
    }

    /// Head-count for a chat header, in `min..=max`.
    pub fn online_count(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// One animation start offset per pulse, each in `0..max_ms`.
    pub fn pulse_offsets(&mut self, count: usize, max_ms: u64) -> Vec<u64> {
        if max_ms == 0 {
            return vec![0; count];
        }
        (0..count).map(|_| self.rng.gen_range(0..max_ms)).collect()
    }
}
