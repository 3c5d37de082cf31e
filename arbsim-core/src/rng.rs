//! Deterministic seeding.
//!
//! Within one run a single `StdRng` drives calibration draws, the price walk
//! and the per-tick shuffle. Batches of runs derive one seed per run from a
//! master seed via BLAKE3, so run `i` gets the same seed no matter how many
//! runs are requested or in which order they execute.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// The generator used for a single run.
pub fn run_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Master seed expanded into per-run seeds.
#[derive(Debug, Clone)]
pub struct RngHierarchy {
    master_seed: u64,
}

impl RngHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Seed for run `index`. Run 0 uses the master seed itself, so a batch of
    /// one reproduces a plain single run.
    pub fn run_seed(&self, index: u64) -> u64 {
        if index == 0 {
            return self.master_seed;
        }
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(b"run");
        hasher.update(&index.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }
}
