//! pulse-sens-types: Shared data types for pulse-sens.
//!
//! This crate contains pure data types (readings, notification requests,
//! sampler and source configs) that are shared across all pulse-sens crates.
//! They have no runtime dependencies, making them suitable as a foundation layer.

pub mod notification;
pub mod reading;
pub mod sampler;
pub mod source_configs;

// Re-export commonly used types at the crate root for convenience
pub use notification::{Anchor, NotificationRequest, Placement, Position, CLICK_MESSAGE};
pub use reading::{ReadError, Reading};
pub use sampler::{FailurePolicy, SamplerConfig};
pub use source_configs::{
    FixedSourceConfig, RandomSourceConfig, SourceConfig, TestMode, TestSourceConfig,
};
