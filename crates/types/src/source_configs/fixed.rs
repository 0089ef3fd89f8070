//! Fixed source configuration types.

use serde::{Deserialize, Serialize};

fn default_value() -> u8 {
    50
}

/// Fixed source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedSourceConfig {
    /// Percentage reported on every read
    #[serde(default = "default_value")]
    pub value: u8,
}

impl Default for FixedSourceConfig {
    fn default() -> Self {
        Self {
            value: default_value(),
        }
    }
}
