//! In-memory software raster
//!
//! Executes [`DrawOp`]s into a [`tiny_skia::Pixmap`] without a browser. Paths
//! are stroked with round caps and joins like the canvas context, but without
//! anti-aliasing, so identical op sequences always produce identical pixels.

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageFormat};
use tiny_skia::{
    BlendMode, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

use super::{DrawOp, DrawingSurface};
use crate::config::WhiteboardConfig;
use crate::error::{Result, WhiteboardError};
use crate::models::{device_size, Color, CompositeOp};

/// Owned RGBA pixels, row-major, 4 bytes per pixel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(WhiteboardError::InvalidRaster {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Lossless PNG encoding
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut png = Vec::new();
        PngEncoder::new(&mut png).write_image(&self.data, self.width, self.height, ColorType::Rgba8)?;
        Ok(png)
    }

    pub fn decode_png(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }
}

/// Software drawing surface
#[derive(Clone, Debug)]
pub struct Raster {
    logical_width: f64,
    logical_height: f64,
    device_pixel_ratio: f64,
    pixmap: Pixmap,

    composite: CompositeOp,
    color: Color,
    line_width: f64,

    /// Current path, logical coordinates
    path: PathBuilder,
}

impl Raster {
    /// Transparent raster of `width` x `height` logical pixels
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Result<Self> {
        Ok(Self {
            logical_width: width,
            logical_height: height,
            device_pixel_ratio,
            pixmap: backing_pixmap(width, height, device_pixel_ratio)?,
            composite: CompositeOp::SourceOver,
            color: Color::BLACK,
            line_width: 1.0,
            path: PathBuilder::new(),
        })
    }

    pub fn from_config(config: &WhiteboardConfig) -> Result<Self> {
        Self::new(config.canvas_width, config.canvas_height, config.device_pixel_ratio)
    }

    /// Snapshot of the backing store as straight RGBA
    pub fn pixels(&self) -> PixelBuffer {
        let data = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        PixelBuffer {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            data,
        }
    }

    pub fn logical_size(&self) -> (f64, f64) {
        (self.logical_width, self.logical_height)
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        let [r, g, b, a] = self.color.to_rgba();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = false;
        paint.blend_mode = match self.composite {
            CompositeOp::SourceOver => BlendMode::SourceOver,
            CompositeOp::DestinationOut => BlendMode::DestinationOut,
        };
        paint
    }

    fn transform(&self) -> Transform {
        let dpr = self.device_pixel_ratio as f32;
        Transform::from_scale(dpr, dpr)
    }

    fn stroke_path(&mut self) {
        // A path with no segment after its move has nothing to stroke
        let Some(path) = self.path.clone().finish() else {
            return;
        };
        let stroke = Stroke {
            width: self.line_width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        let (paint, transform) = (self.paint(), self.transform());
        self.pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }

    fn fill_dot(&mut self, x: f64, y: f64, radius: f64) {
        self.path = PathBuilder::new();
        let (paint, transform) = (self.paint(), self.transform());
        if let Some(circle) = PathBuilder::from_circle(x as f32, y as f32, radius as f32) {
            self.pixmap.fill_path(&circle, &paint, FillRule::Winding, transform, None);
        }
    }
}

impl DrawingSurface for Raster {
    fn apply(&mut self, op: &DrawOp) -> Result<()> {
        match *op {
            DrawOp::SetStyle { composite, color, line_width } => {
                self.composite = composite;
                self.color = color;
                self.line_width = line_width;
            }
            DrawOp::BeginPath => self.path = PathBuilder::new(),
            DrawOp::MoveTo { point } => self.path.move_to(point.x as f32, point.y as f32),
            DrawOp::QuadraticTo { control, end } => self.path.quad_to(
                control.x as f32,
                control.y as f32,
                end.x as f32,
                end.y as f32,
            ),
            DrawOp::Stroke => self.stroke_path(),
            DrawOp::Dot { center, radius } => self.fill_dot(center.x, center.y, radius),
            DrawOp::ResetComposite => self.composite = CompositeOp::SourceOver,
        }
        Ok(())
    }

    fn clear(&mut self, background: Color) -> Result<()> {
        let [r, g, b, a] = background.to_rgba();
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        self.path = PathBuilder::new();
        Ok(())
    }

    fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) -> Result<()> {
        let pixmap = backing_pixmap(width, height, device_pixel_ratio)?;
        log::debug!(
            "Raster: resizing to {}x{} device pixels (dpr {})",
            pixmap.width(),
            pixmap.height(),
            device_pixel_ratio
        );

        self.logical_width = width;
        self.logical_height = height;
        self.device_pixel_ratio = device_pixel_ratio;
        self.pixmap = pixmap;
        self.path = PathBuilder::new();
        Ok(())
    }

    fn read_pixels(&self) -> Result<PixelBuffer> {
        Ok(self.pixels())
    }
}

/// Transparent pixmap sized for the logical canvas at `device_pixel_ratio`
fn backing_pixmap(width: f64, height: f64, device_pixel_ratio: f64) -> Result<Pixmap> {
    let invalid = || {
        WhiteboardError::InvalidConfig(format!(
            "raster dimensions must be positive, got {}x{} at dpr {}",
            width, height, device_pixel_ratio
        ))
    };
    if [width, height, device_pixel_ratio]
        .iter()
        .any(|value| !value.is_finite() || *value <= 0.0)
    {
        return Err(invalid());
    }
    let (w, h) = device_size(width, height, device_pixel_ratio);
    Pixmap::new(w, h).ok_or_else(invalid)
}
