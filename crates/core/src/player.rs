//! Player module - pose and collision-checked movement
//!
//! The player has a continuous position in map-cell units and a heading in
//! radians normalized to `[0, 2π)`. Heading 0 faces +x (east); because rows grow
//! downward, increasing the heading turns clockwise on screen.
//!
//! Collision uses point containment: the cell `(floor(x), floor(y))` must be open.
//! Every motion request is split into an X sub-move and a Y sub-move that are
//! accepted or discarded independently, so a diagonal step along a wall keeps
//! its valid axis. A sub-move is discarded whole if any cell it would pass
//! through is a wall, which also prevents tunnelling through thin walls on
//! large steps. The position therefore never lies inside a wall.

use std::f64::consts::TAU;

use crate::error::{NonFiniteInputError, SpawnError};
use crate::map::GridMap;

/// Result of a movement request. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Every non-zero axis applied
    Moved,
    /// One axis was blocked and discarded, the other applied
    Partial,
    /// Nothing applied; position unchanged
    Rejected,
}

/// Player pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    x: f64,
    y: f64,
    heading: f64,
}

/// Wrap an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU {
        0.0
    } else {
        a
    }
}

impl Player {
    /// Place the player at a start pose.
    ///
    /// Fails if any component is non-finite or the position is inside a wall.
    pub fn spawn(x: f64, y: f64, heading: f64, map: &GridMap) -> Result<Self, SpawnError> {
        let x = NonFiniteInputError::check("x", x)?;
        let y = NonFiniteInputError::check("y", y)?;
        let heading = NonFiniteInputError::check("heading", heading)?;
        if map.is_wall_at(x, y) {
            return Err(SpawnError::InsideWall { x, y });
        }
        Ok(Self {
            x,
            y,
            heading: normalize_angle(heading),
        })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Heading in radians, always in `[0, 2π)`
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Unit vector along the heading
    pub fn direction(&self) -> (f64, f64) {
        (self.heading.cos(), self.heading.sin())
    }

    /// Translate along the heading (negative `distance` moves backward).
    pub fn forward(
        &mut self,
        distance: f64,
        map: &GridMap,
    ) -> Result<MoveOutcome, NonFiniteInputError> {
        let distance = NonFiniteInputError::check("distance", distance)?;
        let (dir_x, dir_y) = self.direction();
        self.try_move(dir_x * distance, dir_y * distance, map)
    }

    /// Rotate the heading by `delta` radians (positive turns right on screen).
    pub fn rotate(&mut self, delta: f64) -> Result<(), NonFiniteInputError> {
        let delta = NonFiniteInputError::check("rotation", delta)?;
        self.heading = normalize_angle(self.heading + delta);
        Ok(())
    }

    /// Attempt a relative move, testing the X and Y sub-moves independently.
    ///
    /// A blocked axis leaves that coordinate unchanged.
    pub fn try_move(
        &mut self,
        dx: f64,
        dy: f64,
        map: &GridMap,
    ) -> Result<MoveOutcome, NonFiniteInputError> {
        let dx = NonFiniteInputError::check("dx", dx)?;
        let dy = NonFiniteInputError::check("dy", dy)?;

        // `None` for an axis with nothing to do.
        let x_ok = (dx != 0.0).then(|| self.try_axis(Axis::X, dx, map));
        let y_ok = (dy != 0.0).then(|| self.try_axis(Axis::Y, dy, map));

        Ok(match (x_ok, y_ok) {
            (Some(false), Some(true)) | (Some(true), Some(false)) => MoveOutcome::Partial,
            (Some(false), _) | (_, Some(false)) => MoveOutcome::Rejected,
            _ => MoveOutcome::Moved,
        })
    }

    fn try_axis(&mut self, axis: Axis, delta: f64, map: &GridMap) -> bool {
        let (from, fixed) = match axis {
            Axis::X => (self.x, self.y),
            Axis::Y => (self.y, self.x),
        };
        let to = from + delta;
        if !to.is_finite() || !path_is_open(map, axis, from, to, fixed) {
            return false;
        }
        match axis {
            Axis::X => self.x = to,
            Axis::Y => self.y = to,
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Walk every cell between `from` and `to` along `axis`; false at the first wall.
///
/// Terminates within one map side because the border ring is solid.
fn path_is_open(map: &GridMap, axis: Axis, from: f64, to: f64, fixed: f64) -> bool {
    let fixed_cell = fixed.floor() as i64;
    let start = from.floor() as i64;
    let end = to.floor() as i64;
    let step = if end >= start { 1 } else { -1 };

    let mut cell = start;
    loop {
        let blocked = match axis {
            Axis::X => map.is_wall_cell(cell, fixed_cell),
            Axis::Y => map.is_wall_cell(fixed_cell, cell),
        };
        if blocked {
            return false;
        }
        if cell == end {
            return true;
        }
        cell += step;
    }
}
