//! Fixed value source

use pulse_sens_core::{ReadError, Reading, SourceMetadata, ValueSource};
use pulse_sens_types::FixedSourceConfig;

/// Reports the same reading on every read
pub struct FixedSource {
    metadata: SourceMetadata,
    value: Result<Reading, ReadError>,
}

impl FixedSource {
    pub fn new(reading: Reading) -> Self {
        Self {
            metadata: SourceMetadata::new("fixed", "Fixed", "Constant level"),
            value: Ok(reading),
        }
    }

    /// Build from config; an out-of-range value makes every read fail
    pub fn with_config(config: &FixedSourceConfig) -> Self {
        Self {
            metadata: SourceMetadata::new("fixed", "Fixed", "Constant level"),
            value: Reading::new(config.value),
        }
    }
}

impl ValueSource for FixedSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn read(&self) -> Result<Reading, ReadError> {
        self.value.clone()
    }

    fn is_available(&self) -> bool {
        self.value.is_ok()
    }
}
