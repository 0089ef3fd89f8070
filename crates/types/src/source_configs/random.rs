//! Random source configuration types.

use serde::{Deserialize, Serialize};

/// Random source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RandomSourceConfig {
    /// Fixed RNG seed for reproducible sequences (entropy-seeded when absent)
    #[serde(default)]
    pub seed: Option<u64>,
}
