//! Surface configuration.
//!
//! Read from JSON. Every field has a default, so `{}` is a valid config.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sketch_core::{parse_hex, Color32, ColorError};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::editor::history::DEFAULT_CAPACITY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurfaceConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    /// Color the canvas starts with and returns to on clear.
    #[serde(default = "default_background")]
    pub background: String,

    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Global alpha of the shape preview while dragging.
    #[serde(default = "default_preview_opacity")]
    pub preview_opacity: f32,

    #[serde(default = "default_brush_size")]
    pub brush_size: f32,

    /// Initially selected drawing color.
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_background() -> String {
    "#ffffff".into()
}

fn default_history_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_preview_opacity() -> f32 {
    0.7
}

fn default_brush_size() -> f32 {
    5.0
}

fn default_color() -> String {
    "#000000".into()
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            history_capacity: default_history_capacity(),
            preview_opacity: default_preview_opacity(),
            brush_size: default_brush_size(),
            color: default_color(),
        }
    }
}

impl SurfaceConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: SurfaceConfig = serde_json::from_str(json).context("parse surface config")?;
        config.validate().context("validate surface config")?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("read config file: {}", path.display()))?;
        let config = Self::from_json_str(&data)
            .with_context(|| format!("load config file: {}", path.display()))?;
        tracing::info!(path = %path.display(), "surface config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            tracing::error!(
                width = self.width,
                height = self.height,
                "canvas size must be non-zero"
            );
            return Err(ConfigError::EmptyCanvas {
                width: self.width,
                height: self.height,
            });
        }

        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }

        if !(self.preview_opacity > 0.0 && self.preview_opacity <= 1.0) {
            return Err(ConfigError::InvalidOpacity {
                value: self.preview_opacity,
            });
        }

        if !(self.brush_size.is_finite() && self.brush_size > 0.0) {
            return Err(ConfigError::InvalidBrushSize {
                value: self.brush_size,
            });
        }

        self.background_color()?;
        self.selected_color()?;
        Ok(())
    }

    pub fn background_color(&self) -> Result<Color32, ConfigError> {
        parse_hex(&self.background).map_err(|source| ConfigError::InvalidColor {
            field: "background",
            source,
        })
    }

    pub fn selected_color(&self) -> Result<Color32, ConfigError> {
        parse_hex(&self.color).map_err(|source| ConfigError::InvalidColor {
            field: "color",
            source,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("canvas size must be non-zero, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("history capacity must be at least 1")]
    ZeroHistoryCapacity,

    #[error("preview opacity must be in (0, 1], got {value}")]
    InvalidOpacity { value: f32 },

    #[error("brush size must be a positive number, got {value}")]
    InvalidBrushSize { value: f32 },

    #[error("invalid color in '{field}': {source}")]
    InvalidColor {
        field: &'static str,
        #[source]
        source: ColorError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = SurfaceConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SurfaceConfig::default());
        assert_eq!(config.history_capacity, 20);
        assert_eq!(config.preview_opacity, 0.7);
    }

    #[test]
    fn test_partial_json() {
        let config =
            SurfaceConfig::from_json_str(r##"{"width": 64, "background": "#102030"}"##).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 600);
        assert_eq!(
            config.background_color().unwrap(),
            Color32::from_rgb(0x10, 0x20, 0x30)
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(SurfaceConfig::from_json_str(r#"{"widht": 10}"#).is_err());
    }

    #[test]
    fn test_validation() {
        let bad_size = SurfaceConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            bad_size.validate(),
            Err(ConfigError::EmptyCanvas { .. })
        ));

        let bad_opacity = SurfaceConfig {
            preview_opacity: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            bad_opacity.validate(),
            Err(ConfigError::InvalidOpacity { .. })
        ));

        let bad_color = SurfaceConfig {
            color: "black".into(),
            ..Default::default()
        };
        assert!(matches!(
            bad_color.validate(),
            Err(ConfigError::InvalidColor { field: "color", .. })
        ));

        let no_history = SurfaceConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            no_history.validate(),
            Err(ConfigError::ZeroHistoryCapacity)
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SurfaceConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("read config file"));
    }
}
