//! Notifier that routes toasts into the log

use pulse_sens_core::{Notifier, Position};

/// Emits every notification as an `info` record under the `toast` target
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn display(&self, message: &str, position: Position) {
        log::info!(target: "toast", "[{}] {}", position.as_str(), message);
    }
}
