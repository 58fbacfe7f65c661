//! Stylizer configuration from environment variables.
//!
//! - `DIFFUSED_RAYS_STYLIZER`: `posterize` (default), `command`, or `off`
//! - `DIFFUSED_RAYS_STYLIZER_CMD`: command line for the `command` stylizer
//! - `DIFFUSED_RAYS_STYLIZER_LATENCY_MS`: simulated latency of `posterize` (default 250)
//! - `DIFFUSED_RAYS_STYLIZE_ON_START`: set to "1" or "true" to start enabled

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::stylizer::{CommandStylizer, PosterizeStylizer, Stylizer};

pub const DEFAULT_LATENCY_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylizerKind {
    Posterize,
    Command,
    Off,
}

impl StylizerKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "posterize" => Some(StylizerKind::Posterize),
            "command" | "cmd" => Some(StylizerKind::Command),
            "off" | "none" => Some(StylizerKind::Off),
            _ => None,
        }
    }
}

/// Startup-fatal configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown stylizer {0:?} (expected posterize, command, or off)")]
    UnknownStylizer(String),

    #[error("DIFFUSED_RAYS_STYLIZER=command requires DIFFUSED_RAYS_STYLIZER_CMD")]
    MissingCommand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylizerConfig {
    pub kind: StylizerKind,
    pub command: Option<String>,
    pub latency: Duration,
    pub enabled_on_start: bool,
}

impl Default for StylizerConfig {
    fn default() -> Self {
        Self {
            kind: StylizerKind::Posterize,
            command: None,
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            enabled_on_start: false,
        }
    }
}

impl StylizerConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let kind = match lookup("DIFFUSED_RAYS_STYLIZER") {
            Some(s) => StylizerKind::from_str(&s).ok_or(ConfigError::UnknownStylizer(s))?,
            None => StylizerKind::Posterize,
        };

        let command = lookup("DIFFUSED_RAYS_STYLIZER_CMD")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });
        if kind == StylizerKind::Command && command.is_none() {
            return Err(ConfigError::MissingCommand);
        }

        let latency = lookup("DIFFUSED_RAYS_STYLIZER_LATENCY_MS")
            .and_then(|s| s.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_LATENCY_MS));

        let enabled_on_start = lookup("DIFFUSED_RAYS_STYLIZE_ON_START")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Ok(Self {
            kind,
            command,
            latency,
            enabled_on_start,
        })
    }

    /// Instantiate the configured stylizer (`None` for `off`).
    pub fn build(&self) -> Result<Option<Arc<dyn Stylizer>>, ConfigError> {
        let stylizer: Arc<dyn Stylizer> = match self.kind {
            StylizerKind::Off => return Ok(None),
            StylizerKind::Posterize => Arc::new(PosterizeStylizer::new(self.latency)),
            StylizerKind::Command => {
                let line = self.command.as_deref().ok_or(ConfigError::MissingCommand)?;
                Arc::new(
                    CommandStylizer::from_command_line(line).ok_or(ConfigError::MissingCommand)?,
                )
            }
        };
        Ok(Some(stylizer))
    }
}
