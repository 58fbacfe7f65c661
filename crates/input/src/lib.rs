//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::InputAction`] and tracks held
//! keys so the loop driver can take one [`crate::types::InputSample`] per tick,
//! including on terminals that never report key releases.

pub mod handler;
pub mod map;

pub use diffused_rays_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, map_key_code, should_quit};
