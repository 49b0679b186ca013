//! Tools, colors and completed strokes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::geometry::Point;
use crate::error::{Result, WhiteboardError};

/// Drawing tool
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}

impl Tool {
    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Pen => "pen",
            Tool::Eraser => "eraser",
        }
    }

    /// Width actually stroked for a given brush width (the eraser is twice as wide)
    pub fn line_width(self, stroke_width: f64) -> f64 {
        match self {
            Tool::Pen => stroke_width,
            Tool::Eraser => stroke_width * 2.0,
        }
    }

    pub fn composite(self) -> CompositeOp {
        match self {
            Tool::Pen => CompositeOp::SourceOver,
            Tool::Eraser => CompositeOp::DestinationOut,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = WhiteboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pen" => Ok(Tool::Pen),
            "eraser" => Ok(Tool::Eraser),
            _ => Err(WhiteboardError::InvalidTool(s.to_string())),
        }
    }
}

/// Canvas compositing mode
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeOp {
    /// Paint over existing pixels
    SourceOver,
    /// Remove existing pixels under the stroke
    DestinationOut,
}

impl CompositeOp {
    /// Value for `CanvasRenderingContext2D.globalCompositeOperation`
    pub fn as_canvas_str(self) -> &'static str {
        match self {
            CompositeOp::SourceOver => "source-over",
            CompositeOp::DestinationOut => "destination-out",
        }
    }
}

/// Opaque RGB color, written as CSS hex
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (case-insensitive)
    pub fn parse_hex(s: &str) -> Result<Self> {
        let invalid = || WhiteboardError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                // #abc is shorthand for #aabbcc
                let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                Ok(Color::new(
                    channel(&expanded[0..2])?,
                    channel(&expanded[2..4])?,
                    channel(&expanded[4..6])?,
                ))
            }
            6 => Ok(Color::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = WhiteboardError;

    fn from_str(s: &str) -> Result<Self> {
        Color::parse_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = WhiteboardError;

    fn try_from(value: String) -> Result<Self> {
        Color::parse_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Brush settings a stroke is drawn with
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    pub tool: Tool,
    pub color: Color,
    pub stroke_width: f64,
}

impl StrokeStyle {
    pub fn new(tool: Tool, color: Color, stroke_width: f64) -> Result<Self> {
        validate_stroke_width(stroke_width)?;
        Ok(Self { tool, color, stroke_width })
    }

    /// Width handed to the surface, after the eraser multiplier
    pub fn line_width(&self) -> f64 {
        self.tool.line_width(self.stroke_width)
    }

    pub fn composite(&self) -> CompositeOp {
        self.tool.composite()
    }
}

pub fn validate_stroke_width(width: f64) -> Result<()> {
    if !width.is_finite() || width <= 0.0 {
        return Err(WhiteboardError::InvalidStrokeWidth(width));
    }
    Ok(())
}

/// A completed pointer gesture. Immutable once recorded.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    points: Vec<Point>,
    tool: Tool,
    color: Color,
    stroke_width: f64,
}

impl Stroke {
    /// A gesture always has at least its pointer-down sample
    pub fn new(points: Vec<Point>, style: StrokeStyle) -> Result<Self> {
        if points.is_empty() {
            return Err(WhiteboardError::EmptyStroke);
        }
        validate_stroke_width(style.stroke_width)?;
        Ok(Self {
            points,
            tool: style.tool,
            color: style.color,
            stroke_width: style.stroke_width,
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            tool: self.tool,
            color: self.color,
            stroke_width: self.stroke_width,
        }
    }

    /// A gesture without movement, drawn as a single dot
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }
}
