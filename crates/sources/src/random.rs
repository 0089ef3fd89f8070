//! Random value source
//!
//! Stand-in for a real level reader: every read is a uniformly random
//! integer percentage.

use pulse_sens_core::{ReadError, Reading, SourceMetadata, ValueSource};
use pulse_sens_types::RandomSourceConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Uniformly random readings in `[0, 100]`
pub struct RandomSource {
    metadata: SourceMetadata,
    rng: Mutex<StdRng>,
}

impl RandomSource {
    pub fn new() -> Self {
        Self::with_config(&RandomSourceConfig::default())
    }

    pub fn with_config(config: &RandomSourceConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            metadata: SourceMetadata::new(
                "random",
                "Random",
                "Uniformly random level, stand-in for a device reading",
            ),
            rng: Mutex::new(rng),
        }
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueSource for RandomSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn read(&self) -> Result<Reading, ReadError> {
        let value = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(0..=pulse_sens_types::reading::READING_MAX);
        Reading::new(value)
    }
}
