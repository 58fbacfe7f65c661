//! Game configuration from environment variables.
//!
//! - `DIFFUSED_RAYS_MOVE_SPEED`: cells per second (default 3.0)
//! - `DIFFUSED_RAYS_TURN_SPEED`: radians per second (default 2.0)
//! - `DIFFUSED_RAYS_FOV_DEG`: horizontal field of view (default 60)
//!
//! Stylizer selection is read by [`StylizerConfig`]. Malformed or
//! non-positive numbers fall back to the defaults.

use crate::pipeline::{ConfigError, StylizerConfig};
use crate::types::{FOV_DEGREES, MOVE_SPEED, TURN_SPEED};

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub move_speed: f64,
    pub turn_speed: f64,
    pub fov_degrees: f64,
    pub stylizer: StylizerConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            turn_speed: TURN_SPEED,
            fov_degrees: FOV_DEGREES,
            stylizer: StylizerConfig::default(),
        }
    }
}

impl GameConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let positive = |key: &str, default: f64| {
            lookup(key)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(default)
        };

        Ok(Self {
            move_speed: positive("DIFFUSED_RAYS_MOVE_SPEED", MOVE_SPEED),
            turn_speed: positive("DIFFUSED_RAYS_TURN_SPEED", TURN_SPEED),
            fov_degrees: positive("DIFFUSED_RAYS_FOV_DEG", FOV_DEGREES),
            stylizer: StylizerConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::StylizerKind;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(GameConfig::from_lookup(lookup(&[])).unwrap(), GameConfig::default());
    }

    #[test]
    fn speeds_and_fov_are_parsed() {
        let config = GameConfig::from_lookup(lookup(&[
            ("DIFFUSED_RAYS_MOVE_SPEED", "4.5"),
            ("DIFFUSED_RAYS_TURN_SPEED", " 1.25 "),
            ("DIFFUSED_RAYS_FOV_DEG", "90"),
            ("DIFFUSED_RAYS_STYLIZER", "off"),
        ]))
        .unwrap();
        assert_eq!(config.move_speed, 4.5);
        assert_eq!(config.turn_speed, 1.25);
        assert_eq!(config.fov_degrees, 90.0);
        assert_eq!(config.stylizer.kind, StylizerKind::Off);
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let config = GameConfig::from_lookup(lookup(&[
            ("DIFFUSED_RAYS_MOVE_SPEED", "fast"),
            ("DIFFUSED_RAYS_TURN_SPEED", "-2"),
            ("DIFFUSED_RAYS_FOV_DEG", "NaN"),
        ]))
        .unwrap();
        assert_eq!(config.move_speed, MOVE_SPEED);
        assert_eq!(config.turn_speed, TURN_SPEED);
        assert_eq!(config.fov_degrees, FOV_DEGREES);
    }

    #[test]
    fn stylizer_errors_propagate() {
        let err = GameConfig::from_lookup(lookup(&[("DIFFUSED_RAYS_STYLIZER", "dalle")]));
        assert_eq!(err, Err(ConfigError::UnknownStylizer("dalle".to_string())));
    }
}
