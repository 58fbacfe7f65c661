//! Core world module - pure, deterministic, and testable
//!
//! This module contains the map, the player pose with its collision rules, and
//! the raycaster. It has **zero dependencies** on terminal I/O or the
//! stylization stage, making it:
//!
//! - **Deterministic**: the same pose and map always render the same frame
//! - **Testable**: every rule is exercised by unit tests
//! - **Fast**: the per-tick render path writes into a reused frame buffer
//!
//! # Module Structure
//!
//! - [`map`]: immutable occupancy grid with enclosure validation
//! - [`player`]: pose, rotation, and axis-decomposed collision-checked movement
//! - [`raycaster`]: DDA ray traversal, perpendicular-distance projection, shading
//! - [`maps`]: built-in map literals
//! - [`error`]: map, spawn, and non-finite input errors
//!
//! # Example
//!
//! ```
//! use diffused_rays_core::{maps, Player, Raycaster, RenderParams};
//!
//! let map = maps::test_map().unwrap();
//! let (x, y, heading) = maps::TEST_MAP_START;
//! let mut player = Player::spawn(x, y, heading, &map).unwrap();
//!
//! // Walk a little and turn.
//! player.forward(0.5, &map).unwrap();
//! player.rotate(0.1).unwrap();
//!
//! let raycaster = Raycaster::new(RenderParams::default()).unwrap();
//! let frame = raycaster.render(&player, &map);
//! assert_eq!(frame.dimensions(), (128, 128));
//! ```

pub mod error;
pub mod map;
pub mod maps;
pub mod player;
pub mod raycaster;

pub use diffused_rays_types as types;

// Re-export commonly used types for convenience
pub use error::{InvalidMapError, NonFiniteInputError, SpawnError};
pub use map::GridMap;
pub use player::{normalize_angle, MoveOutcome, Player};
pub use raycaster::{
    perpendicular_distance, projected_height, RayHit, Raycaster, RenderParams, Side,
};
