//! Deterministic RNG wrapper and seed-derivation helpers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Deterministic RNG handle used for every resampling draw.
///
/// The handle wraps `StdRng` and pins the seeding policy used across the
/// workspace. Callers supply a master `seed: u64`; independent substreams
/// (one per bootstrap trial) are derived by hashing `(master_seed,
/// substream_id)` with SipHash-1-3 keyed with zeros. Because each substream is
/// a pure function of the two integers, trials may run in any order or on any
/// thread and still draw the same indices.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates the handle for substream `substream` of `master_seed`.
    pub fn substream(master_seed: u64, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, substream))
    }

    /// Draws an index uniformly from `0..upper`. `upper` must be non-zero.
    pub fn index_below(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }
}

/// Derives the deterministic seed for a specific substream.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
