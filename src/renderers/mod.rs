//! Renderers module for the Smart Whiteboard
//!
//! Strokes are turned into a small vocabulary of [`DrawOp`]s by the
//! [`StrokeSmoother`]; a [`DrawingSurface`] executes them. Three surfaces exist:
//! a recording [`DisplayList`], the in-memory software [`Raster`], and the
//! browser-backed [`CanvasSurface`].

pub mod display_list;
pub mod smoother;
pub mod raster;
pub mod canvas;

// Re-export commonly used types
pub use display_list::{DisplayList, DrawOp};
pub use smoother::StrokeSmoother;
pub use raster::{PixelBuffer, Raster};
pub use canvas::CanvasSurface;

use crate::error::Result;
use crate::models::Color;

/// Something strokes can be drawn onto.
///
/// Coordinates in ops are logical; the surface applies its own device pixel
/// ratio.
pub trait DrawingSurface {
    /// Execute one draw operation
    fn apply(&mut self, op: &DrawOp) -> Result<()>;

    /// Wipe everything and fill with the page background
    fn clear(&mut self, background: Color) -> Result<()>;

    /// Rebuild the backing store for a new logical size and pixel density.
    /// Content is lost; callers redraw afterwards.
    fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) -> Result<()>;

    /// Copy of the current pixels, in device pixels
    fn read_pixels(&self) -> Result<PixelBuffer>;

    /// Lossless PNG of the current pixels
    fn encode_png(&self) -> Result<Vec<u8>> {
        self.read_pixels()?.encode_png()
    }
}
