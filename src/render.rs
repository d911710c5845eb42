//! Drawing interfaces the scroller renders through.
//!
//! The scroller never touches a graphics API directly. The host implements
//! [`Renderer`] over its immediate-mode drawing context, [`CoordinateMapper`]
//! over its window-to-logical transform, and [`ModalQuery`] over its menu
//! stack.

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};

/// RGBA color with straight (non-premultiplied) alpha, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Immediate-mode drawing primitives.
pub trait Renderer {
    /// Fill `rect` with `color`, rounding its corners by `corner_radius`.
    fn fill_rect(&mut self, rect: Rect, color: Color, corner_radius: f64, layer: i32);

    /// Fill the triangle `p0`, `p1`, `p2` with `color`.
    fn fill_triangle(&mut self, p0: Point, p1: Point, p2: Point, color: Color, layer: i32);
}

/// Converts raw device pixel coordinates to logical coordinates.
pub trait CoordinateMapper {
    fn to_logical(&self, device: Point) -> Point;
}

/// Reports whether a modal UI layer (menu, dialog) currently covers the editor.
pub trait ModalQuery {
    fn is_modal_active(&self) -> bool;
}

impl ModalQuery for bool {
    fn is_modal_active(&self) -> bool {
        *self
    }
}
