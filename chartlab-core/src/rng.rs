//! Deterministic seed derivation for the model layer.
//!
//! A single configured master seed is expanded into per-(ticker, purpose)
//! sub-seeds with BLAKE3, so parallel refreshes across tickers train the same
//! forests no matter which thread picks up which ticker.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Purpose tag for the signal-filter forest.
pub const FILTER_FOREST: &str = "filter-forest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Sub-seed for one ticker and purpose. Independent of derivation order.
    pub fn sub_seed(&self, ticker: &str, purpose: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(ticker.as_bytes());
        // Separator keeps ("AB", "C") distinct from ("A", "BC").
        hasher.update(&[0]);
        hasher.update(purpose.as_bytes());
        let hash = hasher.finalize();

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    pub fn rng_for(&self, ticker: &str, purpose: &str) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(ticker, purpose))
    }
}
