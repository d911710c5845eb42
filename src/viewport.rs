//! The pan target driven by [`crate::scroller::Scroller::update`].

use serde::{Deserialize, Serialize};

/// Direction of a single pan call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanDirection {
    Left,
    Right,
    Up,
    Down,
}

/// The level view the scroller pans.
///
/// Every `amount` is a non-negative length in logical units.
pub trait Viewport {
    fn pan_left(&mut self, amount: f64);
    fn pan_right(&mut self, amount: f64);
    fn pan_up(&mut self, amount: f64);
    fn pan_down(&mut self, amount: f64);

    /// Dispatch to the directional method matching `direction`.
    fn pan(&mut self, direction: PanDirection, amount: f64) {
        match direction {
            PanDirection::Left => self.pan_left(amount),
            PanDirection::Right => self.pan_right(amount),
            PanDirection::Up => self.pan_up(amount),
            PanDirection::Down => self.pan_down(amount),
        }
    }
}
