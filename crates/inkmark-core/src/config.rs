//! Editor configuration.

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::shapes::{ColorParseError, SerializableColor};
use crate::transformer::DEFAULT_HANDLE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<ColorParseError> for ConfigError {
    fn from(err: ColorParseError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for a [`Canvas`](crate::Canvas). Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Undo states kept before the oldest is dropped.
    pub history_limit: usize,
    /// Initial stroke color, as a CSS color string.
    pub stroke_color: String,
    /// Initial line width.
    pub line_width: f64,
    /// Fill shown when no background image is set.
    pub background_color: String,
    pub font_size: f64,
    pub font_family: String,
    /// Transformer handle edge length and corner hit radius.
    pub handle_size: f64,
    /// Mosaic brush width as a multiple of the line width.
    pub mosaic_width_factor: f64,
    /// Pixel block edge used when generating mosaic patterns.
    pub mosaic_block_size: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            stroke_color: "#ff0000".to_string(),
            line_width: 2.0,
            background_color: "#ffffff".to_string(),
            font_size: 20.0,
            font_family: "Arial".to_string(),
            handle_size: DEFAULT_HANDLE_SIZE,
            mosaic_width_factor: 2.0,
            mosaic_block_size: 10,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content).inspect_err(|err| {
            log::warn!("rejected config {}: {}", path.display(), err);
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges and color strings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid("history_limit must be >= 1".to_string()));
        }
        let positive = [
            ("line_width", self.line_width),
            ("font_size", self.font_size),
            ("handle_size", self.handle_size),
            ("mosaic_width_factor", self.mosaic_width_factor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be > 0, got {value}")));
            }
        }
        if self.mosaic_block_size == 0 {
            return Err(ConfigError::Invalid("mosaic_block_size must be > 0".to_string()));
        }
        self.stroke_color()?;
        self.background_color()?;
        Ok(())
    }

    pub fn stroke_color(&self) -> Result<SerializableColor, ColorParseError> {
        self.stroke_color.parse()
    }

    pub fn background_color(&self) -> Result<SerializableColor, ColorParseError> {
        self.background_color.parse()
    }
}
