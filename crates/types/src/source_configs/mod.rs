//! Source configuration types for all value sources.

pub mod fixed;
pub mod random;

// Re-export all source config types for convenience
pub use fixed::FixedSourceConfig;
pub use random::RandomSourceConfig;
pub use test::{TestMode, TestSourceConfig};

use serde::{Deserialize, Serialize};

/// Type-safe enum for all source configurations.
/// Uses serde tag for JSON serialization: {"source_type": "random", ...}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source_type")]
pub enum SourceConfig {
    #[serde(rename = "random")]
    Random(RandomSourceConfig),

    #[serde(rename = "fixed")]
    Fixed(FixedSourceConfig),

    #[serde(rename = "test")]
    Test(TestSourceConfig),
}

impl SourceConfig {
    /// Get the source type ID string
    pub fn source_type(&self) -> &'static str {
        match self {
            SourceConfig::Random(_) => "random",
            SourceConfig::Fixed(_) => "fixed",
            SourceConfig::Test(_) => "test",
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Random(RandomSourceConfig::default())
    }
}
