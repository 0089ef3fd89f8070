//! Notifier trait

use pulse_sens_types::{NotificationRequest, Position};
use std::sync::Arc;

/// Trait for anything that shows short transient messages to the user
///
/// Implementations are fire-and-forget: `display` must return after a short,
/// bounded dispatch and never report failure back to the caller.
pub trait Notifier: Send + Sync {
    /// Show `message` at `position`
    fn display(&self, message: &str, position: Position);

    /// Show `message` at the default position
    fn show(&self, message: &str) {
        self.display(message, Position::default());
    }

    /// Show a prepared request
    fn notify(&self, request: &NotificationRequest) {
        self.display(&request.message, request.position);
    }
}

/// Shared notifier for handing to a sampler
pub type SharedNotifier = Arc<dyn Notifier>;
