//! Smart Whiteboard WASM API
//!
//! The JavaScript-facing side of the crate. Everything here is glue: the
//! drawing and recognition logic lives in [`crate::session`].
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros and JsValue conversions
//! - `dom_view`: [`crate::session::WhiteboardView`] backed by the page's elements
//! - `whiteboard`: the exported `Whiteboard` class

pub mod helpers;
pub mod dom_view;
pub mod whiteboard;

pub use dom_view::DomView;
pub use whiteboard::Whiteboard;
