//! pulse-sens-sources: Value source implementations for pulse-sens.

mod fixed;
mod random;

pub use fixed::FixedSource;
pub use random::RandomSource;
pub use test::TestSource;

use log::debug;
use pulse_sens_core::SharedValueSource;
use pulse_sens_types::SourceConfig;
use std::sync::Arc;

/// Source type IDs accepted by [`create_source`]
pub const SOURCE_TYPES: &[&str] = &["random", "fixed", "test"];

/// Build the value source described by `config`
pub fn create_source(config: &SourceConfig) -> SharedValueSource {
    debug!("Creating '{}' value source", config.source_type());
    match config {
        SourceConfig::Random(c) => Arc::new(RandomSource::with_config(c)),
        SourceConfig::Fixed(c) => Arc::new(FixedSource::with_config(c)),
        SourceConfig::Test(c) => Arc::new(TestSource::with_config(c.clone())),
    }
}
