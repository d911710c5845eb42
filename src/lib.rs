//! On-screen directional scroller for the level editor canvas.
//!
//! The scroller is a small square control pinned to the top or bottom edge of
//! the editor viewport. Pressing the primary button inside it and dragging pans
//! the level view toward the pointer, at a rate proportional to the capped
//! distance between the pointer and the control's hub. The crate owns only the
//! control's geometry and input state machine; panning, drawing and coordinate
//! conversion are delegated to host-provided collaborators.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`scroller`] | The [`scroller::Scroller`] state machine |
//! | [`config`] | Form-factor presets, display mode and settings |
//! | [`geom`] | Points, vectors and rectangles in logical coordinates |
//! | [`input`] | Input event types and the consumed/pass-through outcome |
//! | [`render`] | Renderer, coordinate-mapper and modal-query traits |
//! | [`viewport`] | The pan target trait |
//! | [`replay`] | Headless session replay with recording collaborators |
//! | [`consts`] | Shared numeric constants (layers, colors, arrow size) |

pub mod config;
pub mod consts;
pub mod geom;
pub mod input;
pub mod render;
pub mod replay;
pub mod scroller;
pub mod viewport;
