//! Shared constants for the sampler

use std::time::Duration;

/// Shortest interval the demo binary accepts from the command line.
/// The sampler itself accepts any non-zero interval.
pub const MIN_CLI_INTERVAL: Duration = Duration::from_millis(10);
