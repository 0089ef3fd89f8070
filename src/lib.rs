//! pulse-sens: periodic level sampling bound to a screen's lifetime
//!
//! This library provides:
//! - A host [`Screen`] that owns a sampler and wires the example button
//! - Terminal notifiers standing in for on-screen toasts
//! - Configuration management

pub mod config;
pub mod notifiers;
pub mod screen;

// Re-export commonly used types
pub use config::AppConfig;
pub use pulse_sens_core::{Notifier, Sampler, SamplerState, ValueSource};
pub use screen::Screen;
