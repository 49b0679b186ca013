//! The exported `Whiteboard` class
//!
//! JavaScript owns the event listeners and forwards pointer positions in
//! client coordinates. Session state sits behind `Rc<RefCell<_>>`; no borrow
//! is held across an `.await`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Promise, Uint8Array};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlCanvasElement, Url};

use super::dom_view::DomView;
use super::helpers::{deserialize, from_js_error, serialize, to_js_error};
use crate::config::WhiteboardConfig;
use crate::error::WhiteboardError;
use crate::export::ExportedImage;
use crate::models::{canvas_point, CanvasRect, Point};
use crate::recognition::{OcrAdapter, TesseractEngine};
use crate::renderers::CanvasSurface;
use crate::session::WhiteboardSession;
use crate::{wasm_info, wasm_warn};

type BrowserSession = WhiteboardSession<CanvasSurface, DomView>;

#[wasm_bindgen]
pub struct Whiteboard {
    session: Rc<RefCell<BrowserSession>>,
    ocr: Rc<OcrAdapter<TesseractEngine>>,
}

#[wasm_bindgen]
impl Whiteboard {
    /// Bind to `<canvas id=canvas_id>`. `config` is an optional
    /// `WhiteboardConfig` object; the pixel ratio always comes from the window.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config: JsValue) -> Result<Whiteboard, JsValue> {
        let mut config: WhiteboardConfig = if config.is_undefined() || config.is_null() {
            WhiteboardConfig::default()
        } else {
            deserialize(config, "Invalid whiteboard config")?
        };

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        config.device_pixel_ratio = window.device_pixel_ratio().max(1.0);

        let canvas = window
            .document()
            .and_then(|d| d.get_element_by_id(canvas_id))
            .ok_or_else(|| JsValue::from_str(&format!("canvas #{} not found", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("#{} is not a canvas", canvas_id)))?;

        let surface = CanvasSurface::new(canvas).map_err(|e| to_js_error("Failed to open canvas", e))?;
        let view = DomView::new(canvas_id)?;
        let language = config.ocr_language.clone();

        let session = WhiteboardSession::new(config, surface, view)
            .map_err(|e| to_js_error("Failed to create whiteboard", e))?;
        let session = Rc::new(RefCell::new(session));

        let board = Whiteboard {
            ocr: Rc::new(OcrAdapter::new(Self::ocr_engine(&session), language)),
            session,
        };
        board.load_digit_model();

        wasm_info!("Whiteboard ready on #{}", canvas_id);
        Ok(board)
    }

    fn ocr_engine(session: &Rc<RefCell<BrowserSession>>) -> TesseractEngine {
        let progress = Rc::downgrade(session);
        TesseractEngine::new().with_progress(Rc::new(move |fraction: f64| {
            let Some(session) = progress.upgrade() else {
                return;
            };
            // Progress may arrive while the session is busy elsewhere; skip that tick
            if let Ok(mut session) = session.try_borrow_mut() {
                session.report_ocr_progress(fraction);
            };
        }))
    }

    /// (Re)load the digit model; returns whether it is ready
    #[wasm_bindgen(js_name = loadDigitModel)]
    pub fn load_digit_model(&self) -> bool {
        match self.session.borrow_mut().load_digit_model(Box::new(StdRng::from_entropy())) {
            Ok(()) => true,
            Err(err) => {
                wasm_warn!("Digit recognition unavailable: {}", err);
                false
            }
        }
    }

    fn to_canvas_point(&self, client_x: f64, client_y: f64) -> Point {
        let session = self.session.borrow();
        let surface = session.surface();
        let canvas = surface.canvas();
        let bounds = canvas.get_bounding_client_rect();
        let rect = CanvasRect {
            left: bounds.left(),
            top: bounds.top(),
            width: bounds.width(),
            height: bounds.height(),
        };
        canvas_point(
            client_x,
            client_y,
            &rect,
            canvas.width() as f64,
            canvas.height() as f64,
            surface.device_pixel_ratio(),
        )
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, client_x: f64, client_y: f64) -> Result<(), JsValue> {
        let point = self.to_canvas_point(client_x, client_y);
        self.session
            .borrow_mut()
            .pointer_down(point)
            .map_err(|e| to_js_error("pointerDown failed", e))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, client_x: f64, client_y: f64) -> Result<(), JsValue> {
        if !self.session.borrow().is_drawing() {
            return Ok(());
        }
        let point = self.to_canvas_point(client_x, client_y);
        self.session
            .borrow_mut()
            .pointer_move(point)
            .map_err(|e| to_js_error("pointerMove failed", e))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .pointer_up()
            .map_err(|e| to_js_error("pointerUp failed", e))
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&self) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .pointer_leave()
            .map_err(|e| to_js_error("pointerLeave failed", e))
    }

    #[wasm_bindgen(js_name = selectTool)]
    pub fn select_tool(&self, name: &str) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .select_tool(name)
            .map_err(|e| to_js_error("selectTool failed", e))
    }

    #[wasm_bindgen(js_name = selectColor)]
    pub fn select_color(&self, css: &str) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .select_color(css)
            .map_err(|e| to_js_error("selectColor failed", e))
    }

    #[wasm_bindgen(js_name = setStrokeWidth)]
    pub fn set_stroke_width(&self, width: f64) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .set_stroke_width(width)
            .map_err(|e| to_js_error("setStrokeWidth failed", e))
    }

    pub fn clear(&self) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .clear()
            .map_err(|e| to_js_error("clear failed", e))
    }

    /// Call from the window `resize` listener with `window.devicePixelRatio`
    pub fn resize(&self, device_pixel_ratio: f64) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .resize(device_pixel_ratio.max(1.0))
            .map_err(|e| to_js_error("resize failed", e))
    }

    /// Classify the canvas; the `DigitResult` is shown in the page and returned
    #[wasm_bindgen(js_name = recognizeDigit)]
    pub fn recognize_digit(&self) -> Result<JsValue, JsValue> {
        let result = self
            .session
            .borrow_mut()
            .recognize_digit()
            .map_err(|e| to_js_error("recognizeDigit failed", e))?;
        serialize(&result, "Failed to serialize digit result")
    }

    /// Promise of the `OcrResult`; rejects if an extraction is already running
    #[wasm_bindgen(js_name = extractText)]
    pub fn extract_text(&self) -> Promise {
        let session = self.session.clone();
        let ocr = self.ocr.clone();

        future_to_promise(async move {
            if ocr.is_pending() {
                session.borrow_mut().show_error("Text extraction already in progress");
                return Err(to_js_error("extractText", WhiteboardError::RecognitionBusy));
            }

            let png = session
                .borrow_mut()
                .begin_text_extraction()
                .map_err(|e| to_js_error("extractText failed", e))?;

            let outcome = ocr.extract_text(&png).await;

            let result = session
                .borrow_mut()
                .finish_text_extraction(outcome)
                .map_err(|e| to_js_error("extractText failed", e))?;
            serialize(&result, "Failed to serialize OCR result")
        })
    }

    /// Download the canvas as `whiteboard-<millis>.png`
    #[wasm_bindgen(js_name = exportCanvas)]
    pub fn export_canvas(&self) -> Result<(), JsValue> {
        let image = self
            .session
            .borrow_mut()
            .export()
            .map_err(|e| to_js_error("exportCanvas failed", e))?;
        download(&image).map_err(|e| to_js_error("exportCanvas failed", e))
    }

    /// Returns `true` when the panel is now collapsed
    #[wasm_bindgen(js_name = toggleResults)]
    pub fn toggle_results(&self) -> bool {
        self.session.borrow_mut().toggle_results()
    }

    pub fn status(&self) -> String {
        self.session.borrow().status().to_string()
    }

    #[wasm_bindgen(js_name = strokeCount)]
    pub fn stroke_count(&self) -> usize {
        self.session.borrow().paths().len()
    }
}

/// Offer `image` through a temporary `<a download>`
fn download(image: &ExportedImage) -> crate::error::Result<()> {
    let window = web_sys::window().ok_or_else(|| WhiteboardError::Surface("no window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| WhiteboardError::Surface("no document".to_string()))?;

    let parts = Array::of1(&Uint8Array::from(image.png.as_slice()));
    let properties = BlobPropertyBag::new();
    properties.set_type("image/png");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &properties).map_err(from_js_error)?;
    let href = Url::create_object_url_with_blob(&blob).map_err(from_js_error)?;

    let anchor = document
        .create_element("a")
        .map_err(from_js_error)?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| WhiteboardError::Surface("<a> is not an anchor".to_string()))?;
    anchor.set_href(&href);
    anchor.set_download(&image.filename);
    anchor.click();

    // Release the blob once the click has been handled
    let release = Closure::once_into_js(move || {
        let _ = Url::revoke_object_url(&href);
    });
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(release.unchecked_ref(), 0)
        .map_err(from_js_error)?;
    Ok(())
}
