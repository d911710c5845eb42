//! The scroller state machine.
//!
//! A [`Scroller`] tracks one drag gesture at a time. Pressing the primary
//! button inside the control starts the drag; every pointer motion inside the
//! control recomputes the scroll velocity from the pointer's offset to the hub;
//! each frame [`Scroller::update`] turns that velocity into pan calls on the
//! host [`Viewport`]. Releasing any button ends the drag.
//!
//! The velocity is never cleared on release. It only takes effect through
//! [`Scroller::can_scroll`], which requires an active drag with the pointer
//! still inside the control, so a stale value never moves the view.

#[cfg(test)]
#[path = "scroller_test.rs"]
mod scroller_test;

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::config::{DisplayMode, ScrollerConfig, ScrollerSettings, SharedDisplayMode};
use crate::consts::{
    ARROW_COLOR, ARROW_SIZE, DEFAULT_TOGGLE_KEY, DEFAULT_VIEWPORT_HEIGHT, HUB_CORNER_RADIUS, HUB_HALF_SIZE,
    LAYER_BACKGROUND, LAYER_FOREGROUND, PANEL_COLOR,
};
use crate::geom::{Point, Rect};
use crate::input::{Button, EventOutcome, InputEvent, Key};
use crate::render::{CoordinateMapper, ModalQuery, Renderer};
use crate::viewport::Viewport;

/// Transient gesture state owned by one scroller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollerState {
    /// Primary button is held after a press inside the control.
    pub is_dragging: bool,
    /// Pan rate in logical units per unit of frame time.
    pub scroll_velocity: Point,
    /// Last pointer position in logical coordinates.
    pub pointer_position: Point,
}

/// On-screen directional scroll control for the editor canvas.
#[derive(Debug, Clone)]
pub struct Scroller {
    config: ScrollerConfig,
    mode: SharedDisplayMode,
    toggle_key: Key,
    viewport_height: f64,
    state: ScrollerState,
}

impl Scroller {
    /// Create a scroller that reads and toggles `mode`.
    #[must_use]
    pub fn new(config: ScrollerConfig, mode: SharedDisplayMode) -> Self {
        Self {
            config,
            mode,
            toggle_key: Key::new(DEFAULT_TOGGLE_KEY),
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            state: ScrollerState::default(),
        }
    }

    /// Create a scroller from session settings, sharing `mode` with other views.
    ///
    /// `mode` is not reset to `settings.display_mode`; seed it once when the
    /// editor creates the handle.
    #[must_use]
    pub fn from_settings(settings: &ScrollerSettings, mode: SharedDisplayMode) -> Self {
        Self::new(settings.geometry(), mode)
            .with_toggle_key(settings.toggle_key.clone())
            .with_viewport_height(settings.viewport_height)
    }

    #[must_use]
    pub fn with_toggle_key(mut self, key: Key) -> Self {
        self.toggle_key = key;
        self
    }

    #[must_use]
    pub fn with_viewport_height(mut self, height: f64) -> Self {
        self.viewport_height = height;
        self
    }

    /// Update the logical viewport height used to anchor the control to the bottom edge.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> ScrollerState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> ScrollerConfig {
        self.config
    }

    #[must_use]
    pub fn display_mode(&self) -> DisplayMode {
        self.mode.get()
    }

    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Vertical offset of the control's top edge for the current display mode.
    #[must_use]
    pub fn y_base(&self) -> f64 {
        match self.mode.get() {
            DisplayMode::Bottom => self.viewport_height - self.config.control_size,
            DisplayMode::Top | DisplayMode::None => 0.0,
        }
    }

    /// The control's square in logical viewport coordinates.
    #[must_use]
    pub fn hit_region(&self) -> Rect {
        Rect::square(Point::new(0.0, self.y_base()), self.config.control_size)
    }

    /// The hub center in logical viewport coordinates.
    #[must_use]
    pub fn center(&self) -> Point {
        let c = self.config.center_offset;
        Point::new(c, c + self.y_base())
    }

    /// Whether the current drag should move the view this frame.
    #[must_use]
    pub fn can_scroll(&self) -> bool {
        self.mode.get().is_visible() && self.state.is_dragging && self.pointer_in_region()
    }

    fn pointer_in_region(&self) -> bool {
        self.hit_region().contains(self.state.pointer_position)
    }

    // --- Input ---

    /// Feed one input event. Only a primary press inside the control is consumed.
    pub fn on_event(&mut self, event: &InputEvent, coords: &impl CoordinateMapper) -> EventOutcome {
        match event {
            InputEvent::ButtonDown(Button::Primary) => self.on_primary_down(),
            InputEvent::ButtonUp(_) => {
                if self.state.is_dragging {
                    debug!("scroller drag ended");
                }
                self.state.is_dragging = false;
                EventOutcome::PassThrough
            }
            InputEvent::Motion(device) => {
                self.on_motion(coords.to_logical(*device));
                EventOutcome::PassThrough
            }
            InputEvent::KeyDown(key) if *key == self.toggle_key => {
                let mode = self.mode.toggle();
                info!(%mode, "scroller display mode toggled");
                EventOutcome::PassThrough
            }
            InputEvent::ButtonDown(_) | InputEvent::KeyDown(_) | InputEvent::KeyUp(_) | InputEvent::Wheel(_) => {
                EventOutcome::PassThrough
            }
        }
    }

    fn on_primary_down(&mut self) -> EventOutcome {
        if !self.mode.get().is_visible() || !self.pointer_in_region() {
            return EventOutcome::PassThrough;
        }
        self.state.is_dragging = true;
        debug!(x = self.state.pointer_position.x, y = self.state.pointer_position.y, "scroller drag started");
        EventOutcome::Consumed
    }

    fn on_motion(&mut self, logical: Point) {
        if !self.mode.get().is_visible() {
            return;
        }
        self.state.pointer_position = logical;
        if !self.pointer_in_region() {
            return;
        }

        let d = logical - self.center();
        if let Some(dir) = d.normalized() {
            let magnitude = self.config.speed_cap().min(d.length()) * self.config.max_speed;
            self.state.scroll_velocity = dir * magnitude;
        }
    }

    // --- Frame ---

    /// Pan `viewport` by `scroll_velocity * dt` while a drag is active.
    pub fn update(&self, dt: f64, viewport: &mut impl Viewport) {
        if !self.can_scroll() {
            return;
        }

        let dx = self.state.scroll_velocity.x * dt;
        let dy = self.state.scroll_velocity.y * dt;
        trace!(dx, dy, "scroller pan");

        if dx < 0.0 {
            viewport.pan_left(-dx);
        } else if dx > 0.0 {
            viewport.pan_right(dx);
        }

        if dy < 0.0 {
            viewport.pan_up(-dy);
        } else if dy > 0.0 {
            viewport.pan_down(dy);
        }
    }

    /// Draw the control: background, hub, the live drag arrow, and four fixed arrows.
    pub fn draw(&self, renderer: &mut impl Renderer, modal: &impl ModalQuery) {
        if !self.mode.get().is_visible() || modal.is_modal_active() {
            return;
        }

        let cfg = self.config;
        let anchor = Point::new(0.0, self.y_base());

        renderer.fill_rect(self.hit_region(), PANEL_COLOR, cfg.center_offset, LAYER_BACKGROUND);
        renderer.fill_rect(Rect::centered(self.center(), HUB_HALF_SIZE), PANEL_COLOR, HUB_CORNER_RADIUS, LAYER_FOREGROUND);

        if self.can_scroll() {
            self.draw_arrow(renderer, self.state.pointer_position - anchor);
        }

        let (near, mid, far) = (cfg.edge_inset, cfg.center_offset, cfg.far_offset);
        self.draw_arrow(renderer, Point::new(near, mid));
        self.draw_arrow(renderer, Point::new(far, mid));
        self.draw_arrow(renderer, Point::new(mid, near));
        self.draw_arrow(renderer, Point::new(mid, far));
    }

    /// Draw a triangle at control-local `tip`, pointing away from the hub.
    fn draw_arrow(&self, renderer: &mut impl Renderer, tip: Point) {
        let hub = Point::new(self.config.center_offset, self.config.center_offset);
        let Some(dir) = (tip - hub).normalized() else {
            return;
        };

        let u = dir * ARROW_SIZE;
        let perp = u.perp();
        let anchor = Point::new(0.0, self.y_base());
        renderer.fill_triangle(tip + u + anchor, tip - u + perp + anchor, tip - u - perp + anchor, ARROW_COLOR, LAYER_FOREGROUND);
    }
}
