//! Small helpers shared by the session and the browser bindings

pub mod format;
pub mod performance;

// Re-export commonly used types
pub use format::*;
pub use performance::*;
