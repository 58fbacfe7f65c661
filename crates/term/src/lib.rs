//! Terminal presentation layer.
//!
//! Rendered frames are drawn into a simple framebuffer of styled cells, two
//! pixels per cell using half blocks, and flushed to the terminal as diffs.
//! No widget toolkit is involved: the image is the whole screen apart from a
//! one-line status bar and a one-line controls hint.
//!
//! - [`FrameView`] is pure: frame + HUD state in, framebuffer out
//! - [`TerminalRenderer`] owns the terminal (raw mode, alternate screen, key
//!   release reporting) and does the I/O

pub mod fb;
pub mod frame_view;
pub mod renderer;

pub use diffused_rays_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb, HALF_BLOCK};
pub use frame_view::{FrameView, HudView, StylizationStatus, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
