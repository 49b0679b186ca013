//! Page-backed [`WhiteboardView`]
//!
//! Writes into the elements of the whiteboard page by id. A missing element
//! is logged and skipped so a trimmed-down page still works.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlTextAreaElement, Window};

use crate::models::{Color, DigitResult, OcrResult, Tool};
use crate::session::{ResultPanel, WhiteboardView, ERROR_STATUS_MS, STATUS_READY};
use crate::utils::{format_percent, format_width};
use crate::{wasm_log, wasm_warn};

const CHEVRON_UP: &str = r#"<svg width="14" height="14" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><polyline points="18,15 12,9 6,15"></polyline></svg>"#;
const CHEVRON_DOWN: &str = r#"<svg width="14" height="14" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><polyline points="6,9 12,15 18,9"></polyline></svg>"#;

pub struct DomView {
    window: Window,
    document: Document,
    canvas_id: String,
    /// Timer that puts "Ready to draw" back after an error
    error_timer: Rc<Cell<Option<i32>>>,
}

impl DomView {
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        Ok(Self {
            window,
            document,
            canvas_id: canvas_id.to_string(),
            error_timer: Rc::new(Cell::new(None)),
        })
    }

    fn element(&self, id: &str) -> Option<Element> {
        let element = self.document.get_element_by_id(id);
        if element.is_none() {
            wasm_warn!("Element #{} not found", id);
        }
        element
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(element) = self.element(id) {
            element.set_text_content(Some(text));
        }
    }

    fn set_display(&self, id: &str, visible: bool) {
        let Some(element) = self.element(id).and_then(|e| e.dyn_into::<HtmlElement>().ok()) else {
            return;
        };
        let value = if visible { "block" } else { "none" };
        if let Err(err) = element.style().set_property("display", value) {
            wasm_warn!("Could not set display on #{}: {:?}", id, err);
        }
    }

    fn set_class(&self, element: &Element, class: &str, on: bool) {
        let classes = element.class_list();
        let outcome = if on { classes.add_1(class) } else { classes.remove_1(class) };
        if let Err(err) = outcome {
            wasm_warn!("Could not toggle class {}: {:?}", class, err);
        }
    }

    /// Mark the button matching `selector` active and clear the rest of `group`
    fn highlight(&self, group: &str, selector: &str) {
        if let Ok(buttons) = self.document.query_selector_all(group) {
            for i in 0..buttons.length() {
                if let Some(button) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    self.set_class(&button, "active", false);
                }
            }
        }
        match self.document.query_selector(selector) {
            Ok(Some(button)) => self.set_class(&button, "active", true),
            _ => wasm_log!("No toolbar button for {}", selector),
        }
    }

    fn write_status(document: &Document, message: &str) {
        if let Some(element) = document.get_element_by_id("statusText") {
            element.set_text_content(Some(message));
        }
    }

    fn cancel_error_reset(&self) {
        if let Some(handle) = self.error_timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn loading_id(panel: ResultPanel) -> &'static str {
        match panel {
            ResultPanel::Digit => "loadingDigit",
            ResultPanel::Ocr => "loadingOCR",
        }
    }
}

impl WhiteboardView for DomView {
    fn show_status(&mut self, message: &str) {
        self.cancel_error_reset();
        Self::write_status(&self.document, message);
    }

    fn show_error(&mut self, message: &str) {
        self.cancel_error_reset();
        Self::write_status(&self.document, &format!("Error: {}", message));

        let document = self.document.clone();
        let timer = self.error_timer.clone();
        let reset = Closure::once_into_js(move || {
            timer.set(None);
            Self::write_status(&document, STATUS_READY);
        });
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(reset.unchecked_ref(), ERROR_STATUS_MS as i32)
        {
            Ok(handle) => self.error_timer.set(Some(handle)),
            Err(err) => wasm_warn!("Could not schedule status reset: {:?}", err),
        }
    }

    fn set_loading(&mut self, panel: ResultPanel, loading: bool) {
        if loading {
            self.set_display("emptyState", false);
        }
        self.set_display(Self::loading_id(panel), loading);
    }

    fn show_digit_result(&mut self, result: &DigitResult) {
        self.set_display("emptyState", false);
        self.set_display("digitResults", true);

        self.set_text("recognizedDigit", &result.digit.to_string());
        self.set_text("confidenceScore", &format_percent(result.confidence));

        if let Some(list) = self.element("topPredictions") {
            let html: String = result
                .top_predictions
                .iter()
                .map(|p| {
                    format!(
                        r#"<div class="prediction-item"><span class="prediction-digit">{}</span><span class="prediction-confidence">{}</span></div>"#,
                        p.digit,
                        format_percent(p.confidence)
                    )
                })
                .collect();
            list.set_inner_html(&html);
        }
    }

    fn show_ocr_result(&mut self, result: &OcrResult) {
        self.set_display("emptyState", false);
        self.set_display("ocrResults", true);

        match self.element("extractedText").map(|e| e.dyn_into::<HtmlTextAreaElement>()) {
            Some(Ok(textarea)) => textarea.set_value(&result.text),
            Some(Err(element)) => element.set_text_content(Some(&result.text)),
            None => {}
        }
        self.set_text("ocrConfidence", &format!("Confidence: {}", format_percent(result.confidence)));
    }

    fn hide_results(&mut self) {
        for id in ["digitResults", "ocrResults", "loadingDigit", "loadingOCR"] {
            self.set_display(id, false);
        }
        self.set_display("emptyState", true);
    }

    fn set_results_collapsed(&mut self, collapsed: bool) {
        if let Some(panel) = self.element("resultsPanel") {
            self.set_class(&panel, "collapsed", collapsed);
        }
        if let Some(button) = self.element("toggleResults").and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
            if collapsed {
                button.set_inner_html(CHEVRON_DOWN);
                button.set_title("Show Results");
            } else {
                button.set_inner_html(CHEVRON_UP);
                button.set_title("Hide Results");
            }
        }
    }

    fn set_active_tool(&mut self, tool: Tool) {
        self.highlight(".tool-btn", &format!("[data-tool=\"{}\"]", tool));
        if let Some(canvas) = self.element(&self.canvas_id) {
            self.set_class(&canvas, "eraser", tool == Tool::Eraser);
        }
    }

    fn set_active_color(&mut self, color: Color) {
        self.highlight(".color-btn", &format!("[data-color=\"{}\"]", color));
    }

    fn set_stroke_width(&mut self, width: f64) {
        if let Ok(Some(label)) = self.document.query_selector(".stroke-value") {
            label.set_text_content(Some(&format!("{}px", format_width(width))));
        }
    }
}
