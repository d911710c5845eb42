//! Input model: buttons, keys, the events the scroller reacts to, and the
//! outcome it reports back to the dispatcher.
//!
//! Motion events carry raw device-space coordinates. The scroller converts
//! them to logical coordinates itself, through the host's
//! [`crate::render::CoordinateMapper`], before any hit-testing.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the windowing layer
/// (e.g. `"F9"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// An event delivered by the editor's input dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A pointer button was pressed.
    ButtonDown(Button),
    /// A pointer button was released.
    ButtonUp(Button),
    /// The pointer moved; the point is in device pixels.
    Motion(Point),
    /// A key was pressed.
    KeyDown(Key),
    /// A key was released.
    KeyUp(Key),
    /// The wheel was scrolled.
    Wheel(WheelDelta),
}

/// Whether a handler claimed an event.
///
/// The dispatcher stops walking its handler chain only on `Consumed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    /// The event was handled; later handlers must not see it.
    Consumed,
    /// The event continues down the handler chain.
    PassThrough,
}

impl EventOutcome {
    #[must_use]
    pub fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}
