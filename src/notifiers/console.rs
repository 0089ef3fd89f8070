//! Notifier that prints toasts as text lines

use log::warn;
use pulse_sens_core::{Notifier, Position};
use pulse_sens_types::Anchor;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Prints each notification as one line, prefixed with its placement
///
/// `[top +0,+150] Battery level: 42%`
pub struct ConsoleNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Render one notification line (without trailing newline)
    pub fn format_line(message: &str, position: Position) -> String {
        let placement = position.placement();
        let anchor = match placement.anchor {
            Anchor::TopCenter => "top",
            Anchor::Center => "center",
            Anchor::BottomCenter => "bottom",
        };
        format!(
            "[{} {:+},{:+}] {}",
            anchor, placement.x_offset, placement.y_offset, message
        )
    }
}

impl Notifier for ConsoleNotifier {
    fn display(&self, message: &str, position: Position) {
        let line = Self::format_line(message, position);
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!("Failed to write notification: {}", e);
        }
    }
}
