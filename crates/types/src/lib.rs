//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (raycaster, frame pipeline, terminal display).
//!
//! # Render Resolution
//!
//! Every raw and stylized frame has the same fixed resolution:
//!
//! - **Width**: 128 columns (one ray per column)
//! - **Height**: 128 rows
//!
//! The display is responsible for any upscaling.
//!
//! # Motion and Projection Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Input/render tick interval (~60 FPS) |
//! | `MOVE_SPEED` | 3.0 | Cells per second |
//! | `TURN_SPEED` | 2.0 | Radians per second |
//! | `FOV_DEGREES` | 60 | Horizontal field of view |
//! | `MAX_DEPTH` | 20.0 | Distance at which walls reach the brightness floor |
//!
//! # Wall Shading
//!
//! Wall cells carry a variant code (`>= 1`). Each variant maps to a base color
//! in [`WALL_COLORS`]; unknown variants use [`DEFAULT_WALL_COLOR`]. Faces hit on a
//! horizontal grid line are darkened by [`SIDE_SHADE_FACTOR`], and all walls fade
//! linearly with distance down to [`MIN_BRIGHTNESS`].
//!
//! # Examples
//!
//! ```
//! use diffused_rays_types::{wall_color, InputAction, Rgb, RENDER_WIDTH};
//!
//! assert_eq!(wall_color(1), Rgb::new(180, 0, 0));
//! assert_eq!(wall_color(99), Rgb::new(128, 128, 128));
//!
//! assert_eq!(InputAction::from_str("turnLeft"), Some(InputAction::TurnLeft));
//! assert_eq!(RENDER_WIDTH, 128);
//! ```

pub mod frame;

pub use frame::Frame;

/// Raw/stylized frame width in pixels (one ray per column)
pub const RENDER_WIDTH: u16 = 128;

/// Raw/stylized frame height in pixels
pub const RENDER_HEIGHT: u16 = 128;

/// Fixed tick interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Forward/backward speed in map cells per second
pub const MOVE_SPEED: f64 = 3.0;

/// Turn speed in radians per second
pub const TURN_SPEED: f64 = 2.0;

/// Horizontal field of view in degrees
pub const FOV_DEGREES: f64 = 60.0;

/// Distance (in cells) at which wall brightness bottoms out
pub const MAX_DEPTH: f64 = 20.0;

/// Smallest perpendicular distance used for projection
pub const MIN_PERP_DISTANCE: f64 = 0.001;

/// Brightness multiplier for faces hit on a horizontal grid line (`side == 1`)
pub const SIDE_SHADE_FACTOR: f64 = 0.7;

/// Distant walls never get darker than this
pub const MIN_BRIGHTNESS: f64 = 0.15;

/// Ceiling base color (darkest at the top row, full at the horizon)
pub const CEILING_COLOR: Rgb = Rgb::new(30, 30, 40);

/// Floor base color (full at the horizon, darkest at the bottom row)
pub const FLOOR_COLOR: Rgb = Rgb::new(50, 50, 50);

/// Gradient factor at the top/bottom edge of the frame
pub const VOID_EDGE_FACTOR: f64 = 0.7;

/// Base colors per wall variant (index 0 is wall code 1)
pub const WALL_COLORS: [Rgb; 4] = [
    Rgb::new(180, 0, 0),
    Rgb::new(0, 180, 0),
    Rgb::new(0, 0, 180),
    Rgb::new(180, 180, 0),
];

/// Color for wall variants without an entry in [`WALL_COLORS`]
pub const DEFAULT_WALL_COLOR: Rgb = Rgb::new(128, 128, 128);

/// Look up the base color of a wall variant.
pub fn wall_color(code: u8) -> Rgb {
    match code {
        1..=4 => WALL_COLORS[(code - 1) as usize],
        _ => DEFAULT_WALL_COLOR,
    }
}


/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiply every channel by `factor`, saturating to `0..=255`.
    pub fn scale(self, factor: f64) -> Self {
        let f = |c: u8| (c as f64 * factor).clamp(0.0, 255.0) as u8;
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub const fn from_array(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

/// Discrete player intents sampled once per tick.
///
/// Movement/turning are "held" intents; the rest are edge-triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Translate along the heading
    MoveForward,
    /// Translate against the heading
    MoveBack,
    /// Rotate heading counter-clockwise (on screen)
    TurnLeft,
    /// Rotate heading clockwise (on screen)
    TurnRight,
    /// Enable/disable the stylization stage
    ToggleStylization,
    /// Advance to the next style preset
    CycleStyle,
    /// Leave the game loop
    Quit,
}

impl InputAction {
    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use diffused_rays_types::InputAction;
    ///
    /// assert_eq!(InputAction::from_str("moveForward"), Some(InputAction::MoveForward));
    /// assert_eq!(InputAction::from_str("CYCLESTYLE"), Some(InputAction::CycleStyle));
    /// assert_eq!(InputAction::from_str("strafe"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveforward" => Some(InputAction::MoveForward),
            "moveback" => Some(InputAction::MoveBack),
            "turnleft" => Some(InputAction::TurnLeft),
            "turnright" => Some(InputAction::TurnRight),
            "togglestylization" => Some(InputAction::ToggleStylization),
            "cyclestyle" => Some(InputAction::CycleStyle),
            "quit" => Some(InputAction::Quit),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            InputAction::MoveForward => "moveForward",
            InputAction::MoveBack => "moveBack",
            InputAction::TurnLeft => "turnLeft",
            InputAction::TurnRight => "turnRight",
            InputAction::ToggleStylization => "toggleStylization",
            InputAction::CycleStyle => "cycleStyle",
            InputAction::Quit => "quit",
        }
    }

    /// Whether the action is sampled as a held state rather than a one-shot event.
    pub fn is_held(&self) -> bool {
        matches!(
            self,
            InputAction::MoveForward
                | InputAction::MoveBack
                | InputAction::TurnLeft
                | InputAction::TurnRight
        )
    }
}

/// One tick's worth of input, as consumed by the loop driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSample {
    pub move_forward: bool,
    pub move_back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub toggle_stylization: bool,
    pub cycle_style: bool,
    pub quit: bool,
}

impl InputSample {
    /// Build a sample with exactly the given actions set.
    pub fn with(actions: &[InputAction]) -> Self {
        let mut sample = Self::default();
        for &action in actions {
            sample.set(action);
        }
        sample
    }

    pub fn set(&mut self, action: InputAction) {
        match action {
            InputAction::MoveForward => self.move_forward = true,
            InputAction::MoveBack => self.move_back = true,
            InputAction::TurnLeft => self.turn_left = true,
            InputAction::TurnRight => self.turn_right = true,
            InputAction::ToggleStylization => self.toggle_stylization = true,
            InputAction::CycleStyle => self.cycle_style = true,
            InputAction::Quit => self.quit = true,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}
