//! Headless session replay.
//!
//! A [`Session`] is a JSON script of input events, frame ticks and draw
//! requests. [`replay`] feeds it through a [`Scroller`] wired to recording
//! collaborators and returns a [`Report`] of everything the scroller did:
//! which events it consumed, which pan calls each tick issued, and which
//! shapes each draw produced.
//!
//! ```json
//! {
//!   "display_mode": "top",
//!   "steps": [
//!     { "kind": "motion", "x": 20, "y": 20 },
//!     { "kind": "button_down", "button": "primary" },
//!     { "kind": "motion", "x": 60, "y": 60 },
//!     { "kind": "tick", "dt": 0.1 }
//!   ]
//! }
//! ```

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfigError, DisplayMode, FormFactor, ScrollerSettings, SharedDisplayMode};
use crate::geom::{Point, Rect};
use crate::input::{Button, EventOutcome, InputEvent, Key, WheelDelta};
use crate::render::{Color, CoordinateMapper, Renderer};
use crate::scroller::{Scroller, ScrollerState};
use crate::viewport::{PanDirection, Viewport};

/// Error returned by [`load_session`] and [`replay`].
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// The session file could not be read.
    #[error("failed to read session {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session text is not a valid script.
    #[error("invalid session script: {0}")]
    Parse(#[from] serde_json::Error),
    /// A session-level setting is out of range.
    #[error("invalid session: {0}")]
    InvalidSession(String),
    /// A step carries an unusable value.
    #[error("invalid step {index}: {reason}")]
    InvalidStep { index: usize, reason: String },
    /// The report could not be encoded.
    #[error("failed to encode report: {0}")]
    Encode(#[source] serde_json::Error),
    /// Base settings could not be built.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// =============================================================
// Script
// =============================================================

/// A replayable editor session.
///
/// Unset fields fall back to the base [`ScrollerSettings`] passed to [`replay`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Session {
    #[serde(default)]
    pub form_factor: Option<FormFactor>,
    #[serde(default)]
    pub display_mode: Option<DisplayMode>,
    #[serde(default)]
    pub toggle_key: Option<Key>,
    #[serde(default)]
    pub viewport_height: Option<f64>,
    /// Device pixels per logical pixel.
    #[serde(default = "default_device_scale")]
    pub device_scale: f64,
    pub steps: Vec<Step>,
}

fn default_device_scale() -> f64 {
    1.0
}

impl Session {
    /// Parse a session from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Parse`] for malformed JSON or unknown fields and step kinds.
    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One entry of a session script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    ButtonDown { button: Button },
    ButtonUp { button: Button },
    /// Pointer motion in device pixels.
    Motion { x: f64, y: f64 },
    KeyDown { key: Key },
    KeyUp { key: Key },
    Wheel { dx: f64, dy: f64 },
    /// Advance one frame by `dt`.
    Tick { dt: f64 },
    /// Render one frame.
    Draw,
    /// Open or close a modal layer over the editor.
    Modal { active: bool },
}

impl Step {
    /// The input event this step delivers, if it is an input step.
    #[must_use]
    pub fn to_event(&self) -> Option<InputEvent> {
        match self {
            Self::ButtonDown { button } => Some(InputEvent::ButtonDown(*button)),
            Self::ButtonUp { button } => Some(InputEvent::ButtonUp(*button)),
            Self::Motion { x, y } => Some(InputEvent::Motion(Point::new(*x, *y))),
            Self::KeyDown { key } => Some(InputEvent::KeyDown(key.clone())),
            Self::KeyUp { key } => Some(InputEvent::KeyUp(key.clone())),
            Self::Wheel { dx, dy } => Some(InputEvent::Wheel(WheelDelta { dx: *dx, dy: *dy })),
            Self::Tick { .. } | Self::Draw | Self::Modal { .. } => None,
        }
    }
}

/// Read and parse a session file.
///
/// # Errors
///
/// Returns [`ReplayError::Io`] if the file cannot be read, or [`ReplayError::Parse`].
pub fn load_session(path: &Path) -> Result<Session, ReplayError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Io { path: path.to_path_buf(), source })?;
    Session::from_json(&text)
}

// =============================================================
// Recording collaborators
// =============================================================

/// A single recorded pan call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pan {
    pub direction: PanDirection,
    pub amount: f64,
}

/// A [`Viewport`] that records pan calls instead of moving a level.
#[derive(Debug, Clone, Default)]
pub struct RecordingViewport {
    pub pans: Vec<Pan>,
}

impl RecordingViewport {
    /// Drain the calls recorded since the last drain.
    pub fn take(&mut self) -> Vec<Pan> {
        std::mem::take(&mut self.pans)
    }

    /// Net displacement of all recorded calls (right and down positive).
    #[must_use]
    pub fn net(&self) -> Point {
        net_displacement(&self.pans)
    }
}

impl Viewport for RecordingViewport {
    fn pan_left(&mut self, amount: f64) {
        self.pans.push(Pan { direction: PanDirection::Left, amount });
    }

    fn pan_right(&mut self, amount: f64) {
        self.pans.push(Pan { direction: PanDirection::Right, amount });
    }

    fn pan_up(&mut self, amount: f64) {
        self.pans.push(Pan { direction: PanDirection::Up, amount });
    }

    fn pan_down(&mut self, amount: f64) {
        self.pans.push(Pan { direction: PanDirection::Down, amount });
    }
}

fn net_displacement(pans: &[Pan]) -> Point {
    pans.iter().fold(Point::default(), |acc, pan| {
        let step = match pan.direction {
            PanDirection::Left => Point::new(-pan.amount, 0.0),
            PanDirection::Right => Point::new(pan.amount, 0.0),
            PanDirection::Up => Point::new(0.0, -pan.amount),
            PanDirection::Down => Point::new(0.0, pan.amount),
        };
        acc + step
    })
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum DrawCommand {
    Rect { rect: Rect, color: Color, corner_radius: f64, layer: i32 },
    Triangle { points: [Point; 3], color: Color, layer: i32 },
}

/// A [`Renderer`] and [`CoordinateMapper`] that records shapes.
///
/// Device coordinates map to logical ones by dividing by `scale`.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    scale: f64,
    pub commands: Vec<DrawCommand>,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::with_scale(1.0)
    }
}

impl RecordingRenderer {
    #[must_use]
    pub fn with_scale(scale: f64) -> Self {
        Self { scale, commands: Vec::new() }
    }

    /// Drain the commands recorded since the last drain.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Renderer for RecordingRenderer {
    fn fill_rect(&mut self, rect: Rect, color: Color, corner_radius: f64, layer: i32) {
        self.commands.push(DrawCommand::Rect { rect, color, corner_radius, layer });
    }

    fn fill_triangle(&mut self, p0: Point, p1: Point, p2: Point, color: Color, layer: i32) {
        self.commands.push(DrawCommand::Triangle { points: [p0, p1, p2], color, layer });
    }
}

impl CoordinateMapper for RecordingRenderer {
    fn to_logical(&self, device: Point) -> Point {
        Point::new(device.x / self.scale, device.y / self.scale)
    }
}

// =============================================================
// Report
// =============================================================

/// What the scroller did for one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepRecord {
    Event { index: usize, outcome: EventOutcome },
    Tick { index: usize, dt: f64, pans: Vec<Pan> },
    Draw { index: usize, commands: Vec<DrawCommand> },
    Modal { index: usize, active: bool },
}

/// Result of replaying a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub steps: Vec<StepRecord>,
    /// Net pan over the whole session (right and down positive).
    pub net_pan: Point,
    pub display_mode: DisplayMode,
    pub final_state: ScrollerState,
}

// =============================================================
// Driver
// =============================================================

/// Replay `session` on a fresh scroller configured from `base` plus the session's overrides.
///
/// # Errors
///
/// Returns [`ReplayError::InvalidSession`] for a non-positive `device_scale` or
/// `viewport_height`, and [`ReplayError::InvalidStep`] for a negative or
/// non-finite tick `dt`.
pub fn replay(session: &Session, base: &ScrollerSettings) -> Result<Report, ReplayError> {
    let settings = resolve_settings(session, base)?;
    if !(session.device_scale.is_finite() && session.device_scale > 0.0) {
        return Err(ReplayError::InvalidSession(format!("device_scale must be positive, got {}", session.device_scale)));
    }

    let mode = SharedDisplayMode::new(settings.display_mode);
    let mut scroller = Scroller::from_settings(&settings, mode.clone());
    let mut viewport = RecordingViewport::default();
    let mut renderer = RecordingRenderer::with_scale(session.device_scale);
    let mut modal_active = false;
    let mut all_pans = Vec::new();
    let mut records = Vec::with_capacity(session.steps.len());

    debug!(steps = session.steps.len(), mode = %settings.display_mode, "replaying session");

    for (index, step) in session.steps.iter().enumerate() {
        let record = match step {
            Step::Tick { dt } => {
                if !(dt.is_finite() && *dt >= 0.0) {
                    return Err(ReplayError::InvalidStep { index, reason: format!("dt must be non-negative, got {dt}") });
                }
                scroller.update(*dt, &mut viewport);
                let pans = viewport.take();
                all_pans.extend_from_slice(&pans);
                StepRecord::Tick { index, dt: *dt, pans }
            }
            Step::Draw => {
                scroller.draw(&mut renderer, &modal_active);
                StepRecord::Draw { index, commands: renderer.take() }
            }
            Step::Modal { active } => {
                modal_active = *active;
                StepRecord::Modal { index, active: *active }
            }
            input => {
                let Some(event) = input.to_event() else {
                    continue;
                };
                let outcome = scroller.on_event(&event, &renderer);
                StepRecord::Event { index, outcome }
            }
        };
        records.push(record);
    }

    Ok(Report {
        steps: records,
        net_pan: net_displacement(&all_pans),
        display_mode: mode.get(),
        final_state: scroller.state(),
    })
}

fn resolve_settings(session: &Session, base: &ScrollerSettings) -> Result<ScrollerSettings, ReplayError> {
    let mut settings = match session.form_factor {
        Some(ff) if ff != base.form_factor => ScrollerSettings {
            toggle_key: base.toggle_key.clone(),
            viewport_height: base.viewport_height,
            ..ScrollerSettings::for_form_factor(ff)
        },
        _ => base.clone(),
    };
    if let Some(mode) = session.display_mode {
        settings.display_mode = mode;
    }
    if let Some(key) = &session.toggle_key {
        settings.toggle_key = key.clone();
    }
    if let Some(height) = session.viewport_height {
        if !(height.is_finite() && height > 0.0) {
            return Err(ReplayError::InvalidSession(format!("viewport_height must be positive, got {height}")));
        }
        settings.viewport_height = height;
    }
    Ok(settings)
}
