//! Tesseract.js OCR engine
//!
//! Calls the page-global `Tesseract.recognize(image, lang, { logger })`. If the
//! script is missing the call throws, which surfaces as an engine error and
//! triggers the adapter's simulated fallback.

use std::rc::Rc;

use async_trait::async_trait;
use js_sys::{Array, Object, Promise, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag};

use super::ocr::{EngineText, OcrEngine};
use crate::error::{Result, WhiteboardError};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = Tesseract, js_name = recognize)]
    fn tesseract_recognize(image: &JsValue, lang: &str, options: &JsValue) -> std::result::Result<Promise, JsValue>;
}

/// Progress callback, fraction in 0-1
pub type ProgressFn = Rc<dyn Fn(f64)>;

#[derive(Default)]
pub struct TesseractEngine {
    on_progress: Option<ProgressFn>,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report "recognizing text" progress to `callback`
    pub fn with_progress(mut self, callback: ProgressFn) -> Self {
        self.on_progress = Some(callback);
        self
    }

    fn options(&self) -> (JsValue, Option<Closure<dyn FnMut(JsValue)>>) {
        let options = Object::new();
        let Some(callback) = self.on_progress.clone() else {
            return (options.into(), None);
        };

        let logger = Closure::<dyn FnMut(JsValue)>::new(move |message: JsValue| {
            let status = Reflect::get(&message, &"status".into()).ok().and_then(|s| s.as_string());
            if status.as_deref() == Some("recognizing text") {
                if let Some(progress) = Reflect::get(&message, &"progress".into()).ok().and_then(|p| p.as_f64()) {
                    callback(progress);
                }
            }
        });
        // Setting a property on a fresh plain object cannot fail
        let _ = Reflect::set(&options, &"logger".into(), logger.as_ref());
        (options.into(), Some(logger))
    }
}

#[async_trait(?Send)]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, png: &[u8], language: &str) -> Result<EngineText> {
        let blob = png_blob(png)?;
        // The closure must outlive the promise
        let (options, _logger) = self.options();

        let promise = tesseract_recognize(&blob, language, &options).map_err(ocr_error)?;
        let output = JsFuture::from(promise).await.map_err(ocr_error)?;

        let data = Reflect::get(&output, &"data".into()).map_err(ocr_error)?;
        let text = Reflect::get(&data, &"text".into())
            .map_err(ocr_error)?
            .as_string()
            .ok_or_else(|| WhiteboardError::Ocr("result has no text".to_string()))?;
        let confidence_percent = Reflect::get(&data, &"confidence".into())
            .map_err(ocr_error)?
            .as_f64()
            .unwrap_or(0.0);

        Ok(EngineText { text, confidence_percent })
    }

    fn name(&self) -> &str {
        "tesseract.js"
    }
}

fn png_blob(png: &[u8]) -> Result<JsValue> {
    let parts = Array::of1(&Uint8Array::from(png));
    let properties = BlobPropertyBag::new();
    properties.set_type("image/png");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &properties).map_err(ocr_error)?;
    Ok(blob.into())
}

fn ocr_error(err: JsValue) -> WhiteboardError {
    WhiteboardError::Ocr(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}
