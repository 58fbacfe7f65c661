//! Raycaster module - DDA grid traversal and column projection
//!
//! One ray is cast per output column. Each ray walks the grid with a Digital
//! Differential Analyzer: it keeps the travel distance to the next vertical and
//! next horizontal grid line and always advances across the nearer one, until
//! it enters a wall cell or exceeds the step bound derived from the map size.
//!
//! Hit distances are corrected to perpendicular distance
//! (`euclidean * cos(ray_angle - heading)`) so flat walls do not bow outward.
//! Column height is `frame_height / perpendicular_distance`, centered on the
//! horizon. Wall color comes from the wall palette, darkened for faces hit on a
//! horizontal grid line and faded linearly with distance down to a brightness
//! floor. Everything outside the wall span is a ceiling/floor gradient.
//!
//! Rendering writes into a caller-owned [`Frame`] so the per-tick path does not
//! allocate.

use std::f64::consts::PI;

use crate::error::NonFiniteInputError;
use crate::map::GridMap;
use crate::player::Player;
use crate::types::{
    wall_color, Frame, Rgb, CEILING_COLOR, FLOOR_COLOR, FOV_DEGREES, MAX_DEPTH, MIN_BRIGHTNESS,
    MIN_PERP_DISTANCE, RENDER_HEIGHT, RENDER_WIDTH, SIDE_SHADE_FACTOR, VOID_EDGE_FACTOR,
};

/// Narrowest accepted field of view (radians)
pub const MIN_FOV: f64 = 1e-4;

/// Widest accepted field of view (radians). Stays below π so every column's
/// angular offset has a positive cosine.
pub const MAX_FOV: f64 = PI * 0.995;

/// Direction components smaller than this are treated as parallel to the axis
const PARALLEL_EPSILON: f64 = 1e-12;

/// Which kind of grid line the ray crossed last before the hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Crossed a vertical grid line (x step), `side == 0`
    Vertical,
    /// Crossed a horizontal grid line (y step), `side == 1`
    Horizontal,
}

/// First wall cell hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub map_x: i64,
    pub map_y: i64,
    /// Wall variant code (always `>= 1`)
    pub code: u8,
    pub side: Side,
    /// Euclidean travel distance from the player to the wall face
    pub distance: f64,
    /// Distance projected onto the view direction
    pub perp_distance: f64,
}

/// Projection and shading parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub width: u16,
    pub height: u16,
    /// Horizontal field of view in radians
    pub fov: f64,
    /// Distance at which walls reach `min_brightness`
    pub max_depth: f64,
    pub side_shade: f64,
    pub min_brightness: f64,
    pub ceiling: Rgb,
    pub floor: Rgb,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            width: RENDER_WIDTH,
            height: RENDER_HEIGHT,
            fov: FOV_DEGREES.to_radians(),
            max_depth: MAX_DEPTH,
            side_shade: SIDE_SHADE_FACTOR,
            min_brightness: MIN_BRIGHTNESS,
            ceiling: CEILING_COLOR,
            floor: FLOOR_COLOR,
        }
    }
}

impl RenderParams {
    pub fn with_fov_degrees(mut self, degrees: f64) -> Self {
        self.fov = degrees.to_radians();
        self
    }

    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Ray caster bound to a validated set of [`RenderParams`].
#[derive(Debug, Clone)]
pub struct Raycaster {
    params: RenderParams,
}

impl Raycaster {
    /// Validate parameters.
    ///
    /// Non-finite numbers are rejected; the field of view is clamped to
    /// `[MIN_FOV, MAX_FOV]` and `max_depth` to at least `MIN_PERP_DISTANCE`.
    pub fn new(mut params: RenderParams) -> Result<Self, NonFiniteInputError> {
        params.fov = NonFiniteInputError::check("fov", params.fov)?.clamp(MIN_FOV, MAX_FOV);
        params.max_depth =
            NonFiniteInputError::check("max_depth", params.max_depth)?.max(MIN_PERP_DISTANCE);
        params.side_shade = NonFiniteInputError::check("side_shade", params.side_shade)?;
        params.min_brightness =
            NonFiniteInputError::check("min_brightness", params.min_brightness)?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// Angle of the ray for output column `column`.
    pub fn ray_angle(&self, heading: f64, column: u16) -> f64 {
        let fov = self.params.fov;
        heading - fov / 2.0 + fov * (column as f64 / self.params.width as f64)
    }

    /// Cast a single ray from the player's position.
    ///
    /// Returns `Ok(None)` when nothing is hit within the step bound.
    pub fn cast(
        &self,
        player: &Player,
        map: &GridMap,
        ray_angle: f64,
    ) -> Result<Option<RayHit>, NonFiniteInputError> {
        let ray_angle = NonFiniteInputError::check("ray_angle", ray_angle)?;
        Ok(cast_ray(player, map, ray_angle))
    }

    /// Render a fresh frame. Allocates; prefer [`Raycaster::render_into`] per tick.
    pub fn render(&self, player: &Player, map: &GridMap) -> Frame {
        let mut frame = Frame::new(self.params.width, self.params.height);
        self.render_into(player, map, &mut frame);
        frame
    }

    /// Render into a reusable frame buffer.
    ///
    /// The buffer is reallocated only if its size differs from the parameters.
    pub fn render_into(&self, player: &Player, map: &GridMap, frame: &mut Frame) {
        let p = &self.params;
        if frame.dimensions() != (p.width, p.height) {
            *frame = Frame::new(p.width, p.height);
        }

        self.fill_void(frame);

        for column in 0..p.width {
            let angle = self.ray_angle(player.heading(), column);
            let Some(hit) = cast_ray(player, map, angle) else {
                continue;
            };
            let line = projected_height(hit.perp_distance, p.height, p.max_depth);
            let start = (p.height - line) / 2;
            let color = self.shade(hit.code, hit.perp_distance, hit.side);
            frame.fill_column(column, start, start + line, color);
        }
    }

    /// Ceiling and floor gradient, brightest at the horizon.
    fn fill_void(&self, frame: &mut Frame) {
        let p = &self.params;
        let w = p.width as usize;
        let pixels = frame.pixels_mut();
        for y in 0..p.height {
            let color = void_color(p, y);
            let start = y as usize * w;
            pixels[start..start + w].fill(color);
        }
    }

    /// Wall color for a hit: palette color, side darkening, distance falloff.
    pub fn shade(&self, code: u8, perp_distance: f64, side: Side) -> Rgb {
        let p = &self.params;
        let mut brightness = (1.0 - perp_distance / p.max_depth).max(p.min_brightness);
        if side == Side::Horizontal {
            brightness *= p.side_shade;
        }
        wall_color(code).scale(brightness)
    }
}

/// On-screen wall height for a perpendicular distance, capped at the frame height.
pub fn projected_height(perp_distance: f64, frame_height: u16, max_depth: f64) -> u16 {
    let h = frame_height as f64;
    let perp = perp_distance.clamp(MIN_PERP_DISTANCE, max_depth.max(MIN_PERP_DISTANCE));
    (h / perp).min(h) as u16
}

/// Correct a Euclidean ray distance to the distance along the view direction.
pub fn perpendicular_distance(distance: f64, ray_angle: f64, heading: f64) -> f64 {
    distance * (ray_angle - heading).cos()
}

fn void_color(p: &RenderParams, y: u16) -> Rgb {
    let half = (p.height / 2).max(1) as f64;
    let y = y as f64;
    let span = 1.0 - VOID_EDGE_FACTOR;
    if y < half {
        p.ceiling.scale(VOID_EDGE_FACTOR + span * (y / half))
    } else {
        let below = ((y - half) / half).min(1.0);
        p.floor.scale(VOID_EDGE_FACTOR + span * (1.0 - below))
    }
}

/// DDA traversal. The angle must be finite.
fn cast_ray(player: &Player, map: &GridMap, ray_angle: f64) -> Option<RayHit> {
    let (px, py) = player.position();
    let dir_x = ray_angle.cos();
    let dir_y = ray_angle.sin();

    let mut map_x = px.floor() as i64;
    let mut map_y = py.floor() as i64;

    let (step_x, delta_x, mut side_dist_x) = axis_setup(px, map_x, dir_x);
    let (step_y, delta_y, mut side_dist_y) = axis_setup(py, map_y, dir_y);

    for _ in 0..map.max_ray_steps() {
        let side = if side_dist_x < side_dist_y {
            side_dist_x += delta_x;
            map_x += step_x;
            Side::Vertical
        } else {
            side_dist_y += delta_y;
            map_y += step_y;
            Side::Horizontal
        };

        let code = map.cell_at(map_x, map_y)?;
        if !GridMap::is_wall(code) {
            continue;
        }

        // Undo the step we just took to get the distance at the crossing.
        let distance = match side {
            Side::Vertical => side_dist_x - delta_x,
            Side::Horizontal => side_dist_y - delta_y,
        };
        let distance = distance.max(0.0);
        return Some(RayHit {
            map_x,
            map_y,
            code,
            side,
            distance,
            perp_distance: perpendicular_distance(distance, ray_angle, player.heading()),
        });
    }

    None
}

/// Per-axis DDA setup: (step direction, distance between grid lines, distance
/// to the first grid line). An axis the ray is parallel to never advances.
fn axis_setup(pos: f64, cell: i64, dir: f64) -> (i64, f64, f64) {
    if dir.abs() < PARALLEL_EPSILON {
        return (0, f64::INFINITY, f64::INFINITY);
    }
    let delta = (1.0 / dir).abs();
    if dir < 0.0 {
        (-1, delta, (pos - cell as f64) * delta)
    } else {
        (1, delta, (cell as f64 + 1.0 - pos) * delta)
    }
}
