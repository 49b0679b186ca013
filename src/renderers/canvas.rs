//! Browser canvas surface
//!
//! The only renderer that touches [`web_sys::CanvasRenderingContext2d`]. Ops
//! are issued in logical coordinates; the context carries a `dpr` scale
//! transform set up by [`DrawingSurface::resize`].

use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{DrawOp, DrawingSurface, PixelBuffer};
use crate::error::{Result, WhiteboardError};
use crate::models::{device_size, Color, CompositeOp};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    logical_width: f64,
    logical_height: f64,
    device_pixel_ratio: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| WhiteboardError::Surface("no 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| WhiteboardError::Surface("context is not a 2d context".to_string()))?;

        Ok(Self {
            logical_width: canvas.width() as f64,
            logical_height: canvas.height() as f64,
            device_pixel_ratio: 1.0,
            canvas,
            ctx,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn set_composite(&self, composite: CompositeOp) -> Result<()> {
        self.ctx
            .set_global_composite_operation(composite.as_canvas_str())
            .map_err(js_error)
    }
}

impl DrawingSurface for CanvasSurface {
    fn apply(&mut self, op: &DrawOp) -> Result<()> {
        match op {
            DrawOp::SetStyle { composite, color, line_width } => {
                self.set_composite(*composite)?;
                let css = color.to_hex();
                self.ctx.set_stroke_style_str(&css);
                self.ctx.set_fill_style_str(&css);
                self.ctx.set_line_width(*line_width);
            }
            DrawOp::BeginPath => self.ctx.begin_path(),
            DrawOp::MoveTo { point } => self.ctx.move_to(point.x, point.y),
            DrawOp::QuadraticTo { control, end } => {
                self.ctx.quadratic_curve_to(control.x, control.y, end.x, end.y)
            }
            DrawOp::Stroke => self.ctx.stroke(),
            DrawOp::Dot { center, radius } => {
                self.ctx.begin_path();
                self.ctx
                    .arc(center.x, center.y, *radius, 0.0, 2.0 * PI)
                    .map_err(js_error)?;
                self.ctx.fill();
            }
            DrawOp::ResetComposite => self.set_composite(CompositeOp::SourceOver)?,
        }
        Ok(())
    }

    fn clear(&mut self, background: Color) -> Result<()> {
        self.ctx.save();
        self.set_composite(CompositeOp::SourceOver)?;
        self.ctx.clear_rect(0.0, 0.0, self.logical_width, self.logical_height);
        self.ctx.set_fill_style_str(&background.to_hex());
        self.ctx.fill_rect(0.0, 0.0, self.logical_width, self.logical_height);
        self.ctx.restore();
        Ok(())
    }

    fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) -> Result<()> {
        // Backing store in device pixels, display size in CSS pixels
        let (w, h) = device_size(width, height, device_pixel_ratio);
        self.canvas.set_width(w);
        self.canvas.set_height(h);

        let style = self.canvas.style();
        style
            .set_property("width", &format!("{}px", width))
            .map_err(js_error)?;
        style
            .set_property("height", &format!("{}px", height))
            .map_err(js_error)?;

        // Setting the size resets the context, so the transform and line style go too
        self.ctx
            .set_transform(device_pixel_ratio, 0.0, 0.0, device_pixel_ratio, 0.0, 0.0)
            .map_err(js_error)?;
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        self.ctx.set_image_smoothing_enabled(true);

        self.logical_width = width;
        self.logical_height = height;
        self.device_pixel_ratio = device_pixel_ratio;
        Ok(())
    }

    fn read_pixels(&self) -> Result<PixelBuffer> {
        let (width, height) = (self.canvas.width(), self.canvas.height());
        let image = self
            .ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .map_err(js_error)?;
        PixelBuffer::new(image.width(), image.height(), image.data().0)
    }
}

fn js_error(err: JsValue) -> WhiteboardError {
    WhiteboardError::Surface(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}
