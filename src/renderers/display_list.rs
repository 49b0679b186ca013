//! Display list of canvas draw operations
//!
//! [`DrawOp`] mirrors the handful of `CanvasRenderingContext2D` calls the
//! whiteboard makes. A [`DisplayList`] records them instead of rasterizing,
//! which makes live drawing and redraw directly comparable.

use serde::{Deserialize, Serialize};

use super::{DrawingSurface, PixelBuffer};
use crate::error::{Result, WhiteboardError};
use crate::models::{Color, CompositeOp, Point};

/// One canvas drawing call
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    /// Composite mode, stroke/fill color and line width for what follows
    SetStyle {
        composite: CompositeOp,
        color: Color,
        line_width: f64,
    },

    /// Start a fresh path (forgets any previous segments)
    BeginPath,

    MoveTo { point: Point },

    /// Quadratic Bézier from the current pen position
    QuadraticTo { control: Point, end: Point },

    /// Stroke the current path
    Stroke,

    /// Filled disc, drawn as its own path
    Dot { center: Point, radius: f64 },

    /// Back to `source-over` after a redraw
    ResetComposite,
}

/// Recording surface: keeps ops since the last clear
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    ops: Vec<DrawOp>,

    /// Background of the last clear, if any
    background: Option<Color>,

    width: f64,
    height: f64,
    device_pixel_ratio: f64,
}

impl DisplayList {
    pub fn new() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            ..Default::default()
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Number of stroke and dot ops, i.e. how many times ink hit the surface
    pub fn paint_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Stroke | DrawOp::Dot { .. }))
            .count()
    }
}

impl DrawingSurface for DisplayList {
    fn apply(&mut self, op: &DrawOp) -> Result<()> {
        self.ops.push(op.clone());
        Ok(())
    }

    fn clear(&mut self, background: Color) -> Result<()> {
        self.ops.clear();
        self.background = Some(background);
        Ok(())
    }

    fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) -> Result<()> {
        self.width = width;
        self.height = height;
        self.device_pixel_ratio = device_pixel_ratio;
        self.ops.clear();
        self.background = None;
        Ok(())
    }

    fn read_pixels(&self) -> Result<PixelBuffer> {
        Err(WhiteboardError::Surface(
            "display list records operations and has no pixels".to_string(),
        ))
    }
}
