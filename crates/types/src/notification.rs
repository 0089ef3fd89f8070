//! Notification requests and on-screen placement.

use serde::{Deserialize, Serialize};

/// Message shown when the example button is clicked
pub const CLICK_MESSAGE: &str = "Example button clicked!";

/// Vertical distance from the screen edge for top/bottom placement
pub const EDGE_OFFSET: i32 = 150;

/// Where a transient notification is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Near the top edge, horizontally centered
    Top,
    /// Screen centered
    Center,
    /// Near the bottom edge, horizontally centered
    #[default]
    Bottom,
}

impl Position {
    /// Parse a position hint.
    ///
    /// "top" and "center" match case-insensitively; anything else,
    /// including the empty string, falls back to [`Position::Bottom`].
    pub fn from_hint(hint: &str) -> Self {
        match hint.to_lowercase().as_str() {
            "top" => Position::Top,
            "center" => Position::Center,
            _ => Position::Bottom,
        }
    }

    /// Concrete placement for this position
    pub fn placement(self) -> Placement {
        match self {
            Position::Top => Placement {
                anchor: Anchor::TopCenter,
                x_offset: 0,
                y_offset: EDGE_OFFSET,
            },
            Position::Center => Placement {
                anchor: Anchor::Center,
                x_offset: 0,
                y_offset: 0,
            },
            Position::Bottom => Placement {
                anchor: Anchor::BottomCenter,
                x_offset: 0,
                y_offset: EDGE_OFFSET,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Center => "center",
            Position::Bottom => "bottom",
        }
    }
}

/// Screen anchor a notification is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    TopCenter,
    Center,
    BottomCenter,
}

/// Anchor plus offsets (in pixels) away from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub anchor: Anchor,
    pub x_offset: i32,
    pub y_offset: i32,
}

/// A transient message headed for a notifier. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub message: String,
    pub position: Position,
}

impl NotificationRequest {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// Request produced by a sampling tick, e.g. `"Battery level: 42%"` at the top
    pub fn reading(label: &str, reading: crate::Reading) -> Self {
        Self::new(format!("{}: {}", label, reading), Position::Top)
    }

    /// Request produced by the example button
    pub fn click() -> Self {
        Self::new(CLICK_MESSAGE, Position::Center)
    }
}
