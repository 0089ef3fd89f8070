//! pulse-sens-core: Core traits and the periodic sampler for pulse-sens.
//!
//! This crate contains the two collaborator seams (ValueSource, Notifier),
//! the Sampler that drives them on a background task, and shared constants.

pub mod constants;
mod notifier;
mod sampler;
mod value_source;

pub use constants::MIN_CLI_INTERVAL;
pub use notifier::{Notifier, SharedNotifier};
pub use sampler::{Sampler, SamplerError, SamplerGuard, SamplerState};
pub use value_source::{FnSource, SharedValueSource, SourceMetadata, ValueSource};

// Re-export types used in trait signatures for convenience
pub use pulse_sens_types::{
    FailurePolicy, NotificationRequest, Placement, Position, ReadError, Reading, SamplerConfig,
};
