//! Error taxonomy for map construction, player placement and per-tick input.
//!
//! Wall contact is not in here: a blocked move is an ordinary
//! [`MoveOutcome`](crate::player::MoveOutcome), not an error.

use thiserror::Error;

/// Map rejected at construction time. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMapError {
    #[error("map has no cells")]
    Empty,

    #[error("map is {width}x{height}, both dimensions must be at least 3")]
    TooSmall { width: usize, height: usize },

    #[error("map row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("open cell ({col}, {row}) on the map boundary; the map must be enclosed by walls")]
    OpenBoundary { col: usize, row: usize },

    #[error("map cell ({col}, {row}) is {found:?}, expected a digit")]
    InvalidCell { col: usize, row: usize, found: char },

    #[error("map is {width}x{height}, at most {max} cells per side are supported")]
    TooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
}

/// NaN or infinite value handed to movement or raycasting.
///
/// Only the offending tick's update is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("non-finite {field}: {value}")]
pub struct NonFiniteInputError {
    pub field: &'static str,
    pub value: f64,
}

impl NonFiniteInputError {
    /// Return `Ok(value)` if finite, else an error naming `field`.
    pub fn check(field: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self { field, value })
        }
    }
}

/// Start pose rejected when placing the player.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SpawnError {
    #[error(transparent)]
    NonFinite(#[from] NonFiniteInputError),

    #[error("start position ({x}, {y}) is inside a wall")]
    InsideWall { x: f64, y: f64 },
}
