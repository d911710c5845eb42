//! Scroller configuration: form-factor geometry presets, the shared display
//! mode, and settings parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_TOGGLE_KEY, DEFAULT_VIEWPORT_HEIGHT};
use crate::input::Key;

/// Error returned when a configuration value cannot be parsed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown form factor '{0}' (expected 'pointer' or 'touch')")]
    UnknownFormFactor(String),
    #[error("unknown display mode '{0}' (expected 'none', 'top' or 'bottom')")]
    UnknownDisplayMode(String),
    #[error("invalid {var}: '{value}' is not a positive number")]
    InvalidNumber { var: &'static str, value: String },
    #[error("toggle key must not be empty")]
    EmptyToggleKey,
}

// =============================================================
// Form factor and geometry
// =============================================================

/// Input form factor of the device the editor runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFactor {
    /// Mouse or trackpad.
    Pointer,
    /// Finger input; the control is drawn twice as large and scrolls slower.
    Touch,
}

impl FormFactor {
    /// Best guess for the current build target.
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(any(target_os = "android", target_os = "ios")) { Self::Touch } else { Self::Pointer }
    }
}

impl FromStr for FormFactor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pointer" | "desktop" => Ok(Self::Pointer),
            "touch" | "mobile" => Ok(Self::Touch),
            _ => Err(ConfigError::UnknownFormFactor(s.to_string())),
        }
    }
}

/// Control geometry and speed, all lengths in logical pixels.
///
/// The control occupies a `control_size` square. Its hub sits at
/// `(center_offset, center_offset)` relative to the square's top-left corner;
/// `edge_inset` and `far_offset` place the four fixed direction arrows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollerConfig {
    pub edge_inset: f64,
    pub center_offset: f64,
    pub far_offset: f64,
    pub control_size: f64,
    /// Multiplier applied to the capped drag distance to get velocity.
    pub max_speed: f64,
}

impl ScrollerConfig {
    pub const POINTER: Self =
        Self { edge_inset: 16.0, center_offset: 48.0, far_offset: 80.0, control_size: 96.0, max_speed: 2.0 };

    pub const TOUCH: Self =
        Self { edge_inset: 32.0, center_offset: 96.0, far_offset: 160.0, control_size: 192.0, max_speed: 0.8 };

    #[must_use]
    pub fn for_form_factor(form_factor: FormFactor) -> Self {
        match form_factor {
            FormFactor::Pointer => Self::POINTER,
            FormFactor::Touch => Self::TOUCH,
        }
    }

    /// Longest drag distance that still increases scroll speed.
    #[must_use]
    pub fn speed_cap(&self) -> f64 {
        self.center_offset / 2.0
    }
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self::for_form_factor(FormFactor::detect())
    }
}

// =============================================================
// Display mode
// =============================================================

/// Which viewport edge the control is drawn on, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Hidden; the scroller ignores all input.
    None,
    Top,
    Bottom,
}

impl DisplayMode {
    /// Initial mode for a form factor: touch devices keep the control near the thumbs.
    #[must_use]
    pub fn default_for(form_factor: FormFactor) -> Self {
        match form_factor {
            FormFactor::Pointer => Self::Top,
            FormFactor::Touch => Self::Bottom,
        }
    }

    /// The mode after pressing the toggle key. Only flips between the two edges.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom | Self::None => Self::Top,
        }
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl FromStr for DisplayMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            _ => Err(ConfigError::UnknownDisplayMode(s.to_string())),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Top => "top",
            Self::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// A display mode shared by every scroller built from clones of this handle.
///
/// The editor owns one handle and passes clones to each scroller it creates,
/// so a toggle in one editor view is seen by all of them. Single-threaded:
/// the editor's input and render passes run on the same thread.
#[derive(Debug, Clone)]
pub struct SharedDisplayMode(Rc<Cell<DisplayMode>>);

impl SharedDisplayMode {
    #[must_use]
    pub fn new(mode: DisplayMode) -> Self {
        Self(Rc::new(Cell::new(mode)))
    }

    #[must_use]
    pub fn get(&self) -> DisplayMode {
        self.0.get()
    }

    pub fn set(&self, mode: DisplayMode) {
        self.0.set(mode);
    }

    /// Apply [`DisplayMode::toggled`] and return the new mode.
    pub fn toggle(&self) -> DisplayMode {
        let next = self.get().toggled();
        self.set(next);
        next
    }
}

impl Default for SharedDisplayMode {
    fn default() -> Self {
        Self::new(DisplayMode::default_for(FormFactor::detect()))
    }
}

// =============================================================
// Settings
// =============================================================

/// Everything needed to build a scroller for one editor session.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollerSettings {
    pub form_factor: FormFactor,
    pub display_mode: DisplayMode,
    pub toggle_key: Key,
    pub viewport_height: f64,
}

impl Default for ScrollerSettings {
    fn default() -> Self {
        Self::for_form_factor(FormFactor::detect())
    }
}

impl ScrollerSettings {
    /// Defaults for `form_factor`: its preset display mode, `F9`, and a 600px viewport.
    #[must_use]
    pub fn for_form_factor(form_factor: FormFactor) -> Self {
        Self {
            form_factor,
            display_mode: DisplayMode::default_for(form_factor),
            toggle_key: Key::new(DEFAULT_TOGGLE_KEY),
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }

    /// Build settings from environment variables.
    ///
    /// Optional:
    /// - `SCROLLER_FORM_FACTOR`: `pointer` or `touch` (detected when absent)
    /// - `SCROLLER_DISPLAY_MODE`: `none`, `top` or `bottom` (form-factor default when absent)
    /// - `SCROLLER_TOGGLE_KEY`: key name, default `F9`
    /// - `SCROLLER_VIEWPORT_HEIGHT`: logical height, default 600
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let form_factor = match lookup("SCROLLER_FORM_FACTOR") {
            Some(raw) => raw.parse()?,
            None => FormFactor::detect(),
        };
        let mut settings = Self::for_form_factor(form_factor);

        if let Some(raw) = lookup("SCROLLER_DISPLAY_MODE") {
            settings.display_mode = raw.parse()?;
        }
        if let Some(raw) = lookup("SCROLLER_TOGGLE_KEY") {
            settings.toggle_key = parse_key(&raw)?;
        }
        if let Some(raw) = lookup("SCROLLER_VIEWPORT_HEIGHT") {
            settings.viewport_height = parse_positive("SCROLLER_VIEWPORT_HEIGHT", &raw)?;
        }
        Ok(settings)
    }

    /// Geometry preset for the configured form factor.
    #[must_use]
    pub fn geometry(&self) -> ScrollerConfig {
        ScrollerConfig::for_form_factor(self.form_factor)
    }
}

fn parse_key(raw: &str) -> Result<Key, ConfigError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ConfigError::EmptyToggleKey);
    }
    Ok(Key::new(name))
}

/// Parse a finite, strictly positive number; `var` names the setting in the error.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidNumber`] for anything else.
pub fn parse_positive(var: &'static str, raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ConfigError::InvalidNumber { var, value: raw.to_string() }),
    }
}
