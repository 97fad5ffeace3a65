//! Editor configuration.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Tunable constants for the interaction engine.
///
/// Every field has a default, so a config file only needs the values it
/// wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Lower zoom bound.
    pub min_zoom: f64,
    /// Upper zoom bound.
    pub max_zoom: f64,
    /// Zoom level at session start.
    pub initial_zoom: f64,
    /// Zoom change per wheel notch.
    pub wheel_zoom_step: f64,
    /// Zoom change per zoom-in / zoom-out button press.
    pub button_zoom_step: f64,
    /// Drawn rectangles/circles must exceed this in both dimensions (world units).
    pub min_draw_size: f64,
    /// Size of a newly placed text element.
    pub text_size: Size,
    /// Size of a newly placed sticky note.
    pub sticky_size: Size,
    /// Initial content of a new text element.
    pub text_placeholder: String,
    /// Initial content of a new sticky note.
    pub sticky_placeholder: String,
    /// Maximum time between clicks of a double-click.
    pub double_click_ms: u64,
    /// Maximum pointer travel (screen pixels) between clicks of a double-click.
    pub double_click_distance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: crate::camera::MIN_ZOOM,
            max_zoom: crate::camera::MAX_ZOOM,
            initial_zoom: 1.0,
            wheel_zoom_step: 0.1,
            button_zoom_step: 0.2,
            min_draw_size: 5.0,
            text_size: Size::new(200.0, 40.0),
            sticky_size: Size::new(150.0, 150.0),
            text_placeholder: "New text".to_string(),
            sticky_placeholder: "New sticky note".to_string(),
            double_click_ms: 500,
            double_click_distance: 5.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the values describe a usable editor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.initial_zoom) {
            return Err(ConfigError::Invalid(format!(
                "initial_zoom {} outside [{}, {}]",
                self.initial_zoom, self.min_zoom, self.max_zoom
            )));
        }
        if !(self.wheel_zoom_step > 0.0) || !(self.button_zoom_step > 0.0) {
            return Err(ConfigError::Invalid("zoom steps must be positive".to_string()));
        }
        if !(self.min_draw_size >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_draw_size must not be negative, got {}",
                self.min_draw_size
            )));
        }
        let sizes = [self.text_size, self.sticky_size];
        if sizes.iter().any(|s| !(s.width >= 0.0 && s.height >= 0.0)) {
            return Err(ConfigError::Invalid("element sizes must not be negative".to_string()));
        }
        Ok(())
    }
}
