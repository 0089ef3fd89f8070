//! Built-in notifiers
//!
//! Terminal stand-ins for on-screen toasts.

mod console;
mod log_notifier;

pub use console::ConsoleNotifier;
pub use log_notifier::LogNotifier;
