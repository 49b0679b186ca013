//! Error types for the whiteboard core
//!
//! Every fallible operation in the crate returns [`WhiteboardError`]. The wasm
//! glue turns these into `JsValue` strings at the boundary.

use thiserror::Error;

/// Top-level whiteboard error type
#[derive(Debug, Error)]
pub enum WhiteboardError {
    /// Pixel buffer does not match its declared dimensions
    #[error("Invalid raster: expected {expected} bytes for {width}x{height} RGBA, got {actual}")]
    InvalidRaster {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Color string is not `#rgb` or `#rrggbb`
    #[error("Invalid color: '{0}'")]
    InvalidColor(String),

    /// Unknown tool name
    #[error("Unknown tool: '{0}' (expected 'pen' or 'eraser')")]
    InvalidTool(String),

    /// Stroke width must be finite and strictly positive
    #[error("Invalid stroke width: {0}")]
    InvalidStrokeWidth(f64),

    /// A stroke needs at least one point
    #[error("Stroke has no points")]
    EmptyStroke,

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Digit recognition requested before the model loaded
    #[error("Digit recognition model is not available")]
    ModelUnavailable,

    /// A recognition request is already in flight
    #[error("A recognition request is already in progress")]
    RecognitionBusy,

    /// OCR engine failure (never shown to the user, replaced by the simulated result)
    #[error("OCR engine failed: {0}")]
    Ocr(String),

    /// The drawing surface rejected an operation
    #[error("Drawing surface error: {0}")]
    Surface(String),

    /// PNG encoding failed
    #[error("Image encoding failed: {0}")]
    Encoding(#[from] image::ImageError),

    /// Writing an exported file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WhiteboardError>;
