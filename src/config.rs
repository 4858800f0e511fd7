use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::history::DEFAULT_HISTORY_LIMIT;

/// Engine settings. Every field has a default, so a partial JSON document
/// (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old configs
pub struct EngineConfig {
    /// Maximum number of canvas states kept for undo/redo
    pub history_limit: usize,
    /// Surface size in pixels used for rendering and export
    pub surface_size: [u32; 2],
    /// Initial marker color, straight RGBA
    pub default_color: [u8; 4],
    pub default_width: f32,
    /// Stroke widths below this (or non-finite) are clamped up to it
    pub min_stroke_width: f32,
    pub anti_alias: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            surface_size: [1024, 768],
            default_color: [0, 0, 0, 255],
            default_width: 4.0,
            min_stroke_width: 0.5,
            anti_alias: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::debug!("Loading engine config from {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit < 2 {
            return Err(ConfigError::Invalid(format!(
                "history_limit must be at least 2, got {}",
                self.history_limit
            )));
        }
        let [width, height] = self.surface_size;
        if width == 0 || height == 0 {
            return Err(ConfigError::Invalid(format!(
                "surface_size must be positive, got {}x{}",
                width, height
            )));
        }
        if !(self.min_stroke_width.is_finite() && self.min_stroke_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_stroke_width must be positive, got {}",
                self.min_stroke_width
            )));
        }
        if !(self.default_width.is_finite() && self.default_width >= self.min_stroke_width) {
            return Err(ConfigError::Invalid(format!(
                "default_width must be at least {}, got {}",
                self.min_stroke_width, self.default_width
            )));
        }
        Ok(())
    }

    pub fn default_color32(&self) -> Color32 {
        let [r, g, b, a] = self.default_color;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}
