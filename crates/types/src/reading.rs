//! Sampled level readings.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Upper bound of a reading, in percent.
pub const READING_MAX: u8 = 100;

/// One sampled level, an integer percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Reading(u8);

impl Reading {
    /// Lowest possible reading
    pub const MIN: Reading = Reading(0);
    /// Highest possible reading
    pub const MAX: Reading = Reading(READING_MAX);

    /// Create a reading, rejecting values above 100.
    pub fn new(percent: u8) -> Result<Self, ReadError> {
        if percent > READING_MAX {
            return Err(ReadError::OutOfRange(percent as i64));
        }
        Ok(Self(percent))
    }

    /// Create a reading from a floating point level, rounding and clamping to `[0, 100]`.
    ///
    /// NaN is treated as unavailable.
    pub fn from_f64_clamped(level: f64) -> Result<Self, ReadError> {
        if level.is_nan() {
            return Err(ReadError::Unavailable("level is NaN".to_string()));
        }
        Ok(Self(level.round().clamp(0.0, READING_MAX as f64) as u8))
    }

    /// The percentage value
    pub fn percent(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Reading {
    type Error = ReadError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Reading> for u8 {
    fn from(reading: Reading) -> Self {
        reading.0
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Failure to produce a reading for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The underlying value could not be obtained right now
    #[error("value unavailable: {0}")]
    Unavailable(String),
    /// The source produced a value outside `[0, 100]`
    #[error("reading {0} is outside 0..=100")]
    OutOfRange(i64),
    /// The read did not finish within the configured bound
    #[error("read timed out after {0:?}")]
    TimedOut(std::time::Duration),
}
