//! What the session tells the page

use crate::models::{Color, DigitResult, OcrResult, Tool};

/// The two result cards
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultPanel {
    Digit,
    Ocr,
}

/// Presentation side of the whiteboard.
///
/// The browser implementation writes into the page; tests record calls.
pub trait WhiteboardView {
    fn show_status(&mut self, message: &str);

    /// Transient error line; the browser view reverts to "Ready to draw" later
    fn show_error(&mut self, message: &str) {
        self.show_status(&format!("Error: {}", message));
    }

    fn set_loading(&mut self, panel: ResultPanel, loading: bool);
    fn show_digit_result(&mut self, result: &DigitResult);
    fn show_ocr_result(&mut self, result: &OcrResult);

    /// Hide both cards and bring back the empty state
    fn hide_results(&mut self);

    fn set_results_collapsed(&mut self, collapsed: bool);

    // Toolbar highlighting
    fn set_active_tool(&mut self, _tool: Tool) {}
    fn set_active_color(&mut self, _color: Color) {}
    fn set_stroke_width(&mut self, _width: f64) {}
}

/// One call into a [`RecordingView`]
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    Status(String),
    Loading(ResultPanel, bool),
    Digit(DigitResult),
    Ocr(OcrResult),
    ResultsHidden,
    Collapsed(bool),
    Tool(Tool),
    Color(Color),
    StrokeWidth(f64),
}

/// Headless view that keeps every call, for tests and native embedding
#[derive(Clone, Debug, Default)]
pub struct RecordingView {
    events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    /// Status messages in order
    pub fn statuses(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Status(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<&str> {
        self.statuses().last().copied()
    }
}

impl WhiteboardView for RecordingView {
    fn show_status(&mut self, message: &str) {
        self.events.push(ViewEvent::Status(message.to_string()));
    }

    fn set_loading(&mut self, panel: ResultPanel, loading: bool) {
        self.events.push(ViewEvent::Loading(panel, loading));
    }

    fn show_digit_result(&mut self, result: &DigitResult) {
        self.events.push(ViewEvent::Digit(result.clone()));
    }

    fn show_ocr_result(&mut self, result: &OcrResult) {
        self.events.push(ViewEvent::Ocr(result.clone()));
    }

    fn hide_results(&mut self) {
        self.events.push(ViewEvent::ResultsHidden);
    }

    fn set_results_collapsed(&mut self, collapsed: bool) {
        self.events.push(ViewEvent::Collapsed(collapsed));
    }

    fn set_active_tool(&mut self, tool: Tool) {
        self.events.push(ViewEvent::Tool(tool));
    }

    fn set_active_color(&mut self, color: Color) {
        self.events.push(ViewEvent::Color(color));
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.events.push(ViewEvent::StrokeWidth(width));
    }
}
