//! Style parameters and the preset ring cycled by the player.
//!
//! The pipeline never interprets these values; they travel unmodified from the
//! preset ring to whichever [`Stylizer`](crate::Stylizer) is installed.

use serde::{Deserialize, Serialize};

/// Default img2img prompt
pub const DEFAULT_PROMPT: &str = "dark dungeon corridor, stone walls, torchlight, fantasy art";

/// Opaque stylization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleParams {
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: String,
    /// Inference step count
    pub steps: u32,
    /// How far the output may move away from the input (0..=1)
    pub strength: f32,
    pub guidance_scale: f32,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            negative_prompt: String::new(),
            steps: 2,
            strength: 0.5,
            guidance_scale: 0.0,
        }
    }
}

impl StyleParams {
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }
}

/// A named set of style parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePreset {
    pub name: String,
    pub params: StyleParams,
}

impl StylePreset {
    pub fn new(name: impl Into<String>, params: StyleParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Non-empty ring of presets with a cursor.
#[derive(Debug, Clone)]
pub struct StylePresets {
    presets: Vec<StylePreset>,
    index: usize,
}

impl Default for StylePresets {
    fn default() -> Self {
        let preset = |name: &str, prompt: &str, strength: f32| {
            StylePreset::new(
                name,
                StyleParams {
                    strength,
                    ..StyleParams::with_prompt(prompt)
                },
            )
        };
        Self {
            presets: vec![
                preset("dungeon", DEFAULT_PROMPT, 0.5),
                preset(
                    "cavern",
                    "damp limestone cavern, glowing moss, volumetric light",
                    0.55,
                ),
                preset(
                    "neon",
                    "cyberpunk alley, neon signs, wet reflective walls",
                    0.6,
                ),
                preset(
                    "watercolor",
                    "watercolor painting of an ancient maze, soft washes",
                    0.45,
                ),
            ],
            index: 0,
        }
    }
}

impl StylePresets {
    /// Returns `None` for an empty list.
    pub fn new(presets: Vec<StylePreset>) -> Option<Self> {
        if presets.is_empty() {
            return None;
        }
        Some(Self { presets, index: 0 })
    }

    pub fn current(&self) -> &StylePreset {
        &self.presets[self.index]
    }

    /// Advance to the next preset, wrapping around.
    pub fn cycle(&mut self) -> &StylePreset {
        self.index = (self.index + 1) % self.presets.len();
        self.current()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_turbo_settings() {
        let p = StyleParams::default();
        assert_eq!(p.prompt, DEFAULT_PROMPT);
        assert_eq!(p.steps, 2);
        assert_eq!(p.strength, 0.5);
        assert_eq!(p.guidance_scale, 0.0);
    }

    #[test]
    fn cycle_wraps_around() {
        let mut presets = StylePresets::default();
        let first = presets.current().name.clone();
        for _ in 0..presets.len() {
            presets.cycle();
        }
        assert_eq!(presets.current().name, first);
    }

    #[test]
    fn empty_preset_list_is_rejected() {
        assert!(StylePresets::new(Vec::new()).is_none());
    }

    #[test]
    fn params_serialize_to_json() {
        let json = serde_json::to_value(StyleParams::default()).unwrap();
        assert_eq!(json["steps"], 2);
        assert_eq!(json["prompt"], DEFAULT_PROMPT);
        let back: StyleParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, StyleParams::default());
    }
}
