//! Sampler configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default sampling interval (one minute)
pub const DEFAULT_INTERVAL_MS: u64 = 60_000;

/// Default label prefixed to every reading
pub const DEFAULT_LABEL: &str = "Battery level";

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

/// What the sampler does after a failed read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Skip the tick and keep the fixed interval
    #[default]
    Skip,
    /// Skip the tick and double the wait per consecutive failure, up to a cap
    Backoff { max_interval_ms: u64 },
}

impl FailurePolicy {
    /// Wait before the next read, given the base interval and the number of
    /// consecutive failures so far.
    pub fn next_wait(self, interval: Duration, consecutive_failures: u32) -> Duration {
        match self {
            FailurePolicy::Skip => interval,
            FailurePolicy::Backoff { max_interval_ms } => {
                let cap = Duration::from_millis(max_interval_ms).max(interval);
                let factor = 1u32.checked_shl(consecutive_failures.min(31)).unwrap_or(u32::MAX);
                interval.checked_mul(factor).map_or(cap, |wait| wait.min(cap))
            }
        }
    }
}

/// Sampler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Time between samples in milliseconds; the first sample waits one full interval
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Prefix of each notification, rendered as "<label>: <n>%"
    #[serde(default = "default_label")]
    pub label: String,
    /// Upper bound on a single read in milliseconds (unbounded when absent)
    #[serde(default)]
    pub read_timeout_ms: Option<u64>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl SamplerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    /// Config with the given interval and defaults otherwise
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval_ms: interval.as_millis().min(u64::MAX as u128) as u64,
            ..Self::default()
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            label: default_label(),
            read_timeout_ms: None,
            failure_policy: FailurePolicy::default(),
        }
    }
}
