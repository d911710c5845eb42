//! Shared numeric constants for the scroller crate.

use crate::render::Color;

// ── Layers ──────────────────────────────────────────────────────

/// Base draw layer of the editor GUI.
pub const LAYER_GUI: i32 = 500;

/// Layer of the control's background square.
pub const LAYER_BACKGROUND: i32 = LAYER_GUI - 10;

/// Layer of the hub and the direction arrows.
pub const LAYER_FOREGROUND: i32 = LAYER_GUI - 20;

// ── Geometry ────────────────────────────────────────────────────

/// Half the side length of the hub square, in logical pixels.
pub const HUB_HALF_SIZE: f64 = 8.0;

/// Corner radius of the hub square.
pub const HUB_CORNER_RADIUS: f64 = 8.0;

/// Half-length of an arrow triangle along its pointing direction.
pub const ARROW_SIZE: f64 = 8.0;

// ── Colors ──────────────────────────────────────────────────────

/// Fill for the background square and the hub.
pub const PANEL_COLOR: Color = Color::new(0.9, 0.9, 1.0, 0.6);

/// Fill for the direction arrows.
pub const ARROW_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.5);

// ── Defaults ────────────────────────────────────────────────────

/// Logical viewport height assumed until the host reports one.
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;

/// Key name that flips the control between the top and bottom edge.
pub const DEFAULT_TOGGLE_KEY: &str = "F9";
