//! Whiteboard configuration
//!
//! Passed from JavaScript as a plain object (any missing key falls back to its
//! default) or built natively with [`WhiteboardConfig::default`].

use serde::{Deserialize, Serialize};

use crate::error::{Result, WhiteboardError};
use crate::models::{Color, StrokeStyle, Tool};

/// Logical canvas width in CSS pixels
pub const DEFAULT_CANVAS_WIDTH: f64 = 1200.0;
/// Logical canvas height in CSS pixels
pub const DEFAULT_CANVAS_HEIGHT: f64 = 800.0;
/// Mean-RGB brightness below which a pixel counts as ink
pub const DEFAULT_DARK_THRESHOLD: f64 = 200.0;
/// Upper bound (exclusive) of the per-class classifier jitter
pub const DEFAULT_MAX_JITTER: f64 = 0.1;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WhiteboardConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub device_pixel_ratio: f64,
    pub background: Color,

    pub default_tool: Tool,
    pub default_color: Color,
    pub default_stroke_width: f64,

    /// Brightness threshold for the digit pattern analyzer (0-255)
    pub dark_threshold: f64,
    /// Central window bounds as fractions of width/height
    pub center_window: (f64, f64),
    pub max_jitter: f64,

    /// Language code handed to the OCR engine
    pub ocr_language: String,
    /// Exported files are named `<prefix>-<unix millis>.png`
    pub export_prefix: String,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            device_pixel_ratio: 1.0,
            background: Color::WHITE,
            default_tool: Tool::Pen,
            default_color: Color::BLACK,
            default_stroke_width: 2.0,
            dark_threshold: DEFAULT_DARK_THRESHOLD,
            center_window: (0.3, 0.7),
            max_jitter: DEFAULT_MAX_JITTER,
            ocr_language: "eng".to_string(),
            export_prefix: "whiteboard".to_string(),
        }
    }
}

impl WhiteboardConfig {
    /// Check every value is in range
    pub fn validate(&self) -> Result<()> {
        self.validate_canvas()?;
        self.validate_recognition()
    }

    /// Canvas geometry, brush defaults and export naming; drawing depends only on these
    pub fn validate_canvas(&self) -> Result<()> {
        for (name, value) in [
            ("canvas width", self.canvas_width),
            ("canvas height", self.canvas_height),
            ("device pixel ratio", self.device_pixel_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(WhiteboardError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        StrokeStyle::new(self.default_tool, self.default_color, self.default_stroke_width)?;

        if self.export_prefix.is_empty() {
            return Err(WhiteboardError::InvalidConfig(
                "export prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Analyzer and classifier parameters
    pub fn validate_recognition(&self) -> Result<()> {
        if !(0.0..=255.0).contains(&self.dark_threshold) {
            return Err(WhiteboardError::InvalidConfig(format!(
                "dark threshold must be within 0-255, got {}",
                self.dark_threshold
            )));
        }

        let (low, high) = self.center_window;
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low >= high {
            return Err(WhiteboardError::InvalidConfig(format!(
                "center window must satisfy 0 <= low < high <= 1, got ({}, {})",
                low, high
            )));
        }

        if !self.max_jitter.is_finite() || self.max_jitter < 0.0 {
            return Err(WhiteboardError::InvalidConfig(format!(
                "max jitter must be non-negative, got {}",
                self.max_jitter
            )));
        }

        if self.ocr_language.trim().is_empty() {
            return Err(WhiteboardError::InvalidConfig(
                "OCR language must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Brush the session starts with
    pub fn default_style(&self) -> Result<StrokeStyle> {
        StrokeStyle::new(self.default_tool, self.default_color, self.default_stroke_width)
    }
}
