//! Models module for the Smart Whiteboard
//!
//! This module contains the data models shared by the renderer, the path
//! store and the recognition pipeline.

pub mod geometry;
pub mod stroke;
pub mod path_store;
pub mod recognition;

// Re-export commonly used types
pub use geometry::*;
pub use stroke::*;
pub use path_store::PathStore;
pub use recognition::*;
