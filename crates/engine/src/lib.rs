//! Engine module - the per-tick driver tying the crates together
//!
//! [`Game`] owns the grid map, the player, the raycaster, a reusable raw frame,
//! the frame pipeline, and the style presets. Each call to [`Game::tick`]:
//!
//! 1. applies edge-triggered actions (toggle stylization, cycle style)
//! 2. turns and moves the player by `speed * dt`
//! 3. renders the raw frame in place
//! 4. feeds it to the pipeline and returns the frame to display
//!
//! Nothing here touches the terminal, so the whole loop is testable headless.
//!
//! # Example
//!
//! ```
//! use diffused_rays_engine::{Game, GameConfig};
//! use diffused_rays_types::{InputAction, InputSample};
//!
//! let mut config = GameConfig::default();
//! config.stylizer.kind = diffused_rays_pipeline::StylizerKind::Off;
//! let mut game = Game::new(&config).unwrap();
//!
//! let report = game.tick(&InputSample::with(&[InputAction::MoveForward]), 0.1);
//! assert!(!report.quit);
//! assert!(game.player().x() > 5.0);
//! ```

pub mod config;
pub mod game;

pub use diffused_rays_core as core;
pub use diffused_rays_pipeline as pipeline;
pub use diffused_rays_types as types;

pub use config::GameConfig;
pub use game::{EngineError, Game, TickReport};
