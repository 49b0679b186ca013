//! Smart Whiteboard WASM Module
//!
//! Freehand drawing surface with two recognition features: a heuristic digit
//! classifier running over the rendered raster, and text extraction through an
//! external OCR engine with a simulated fallback.
//!
//! Everything outside [`api`] and the browser-backed surfaces is free of DOM
//! types and runs natively, which is how the test suite drives it.

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod recognition;
pub mod renderers;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::WhiteboardConfig;
pub use error::{Result, WhiteboardError};
pub use models::*;
pub use export::ExportedImage;
pub use session::{ModelStatus, RecordingView, ResultPanel, ViewEvent, WhiteboardSession, WhiteboardView};
pub use api::Whiteboard;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize logger");

    log::info!("Smart Whiteboard WASM module initialized");
}
