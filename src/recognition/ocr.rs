//! OCR adapter
//!
//! Hands a PNG of the canvas to an external [`OcrEngine`]. When the engine
//! fails for any reason the caller gets a canned, clearly tagged stand-in
//! instead of an error. Only one extraction may be in flight at a time.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::{Result, WhiteboardError};
use crate::models::{OcrResult, OcrSource};

/// Prefix marking simulated text
pub const SIMULATED_PREFIX: &str = "Demo: ";

/// Phrases the fallback picks from
pub const SAMPLE_TEXTS: [&str; 5] = [
    "Hello World",
    "Smart Whiteboard",
    "AI Recognition",
    "Text Extraction",
    "Machine Learning",
];

/// Simulated confidence range, percent
const SIMULATED_CONFIDENCE: std::ops::Range<f64> = 75.0..95.0;

/// What an engine returns, on the engine's own scale
#[derive(Clone, Debug, PartialEq)]
pub struct EngineText {
    pub text: String,
    /// 0-100
    pub confidence_percent: f64,
}

/// External text-recognition engine
#[async_trait(?Send)]
pub trait OcrEngine {
    /// Recognize text in a PNG image
    async fn recognize(&self, png: &[u8], language: &str) -> Result<EngineText>;

    fn name(&self) -> &str {
        "ocr"
    }
}

pub struct OcrAdapter<E, R = StdRng> {
    engine: E,
    language: String,
    rng: RefCell<R>,
    pending: Cell<bool>,
}

impl<E: OcrEngine> OcrAdapter<E, StdRng> {
    pub fn new(engine: E, language: impl Into<String>) -> Self {
        Self::with_rng(engine, language, StdRng::from_entropy())
    }
}

impl<E: OcrEngine, R: RngCore> OcrAdapter<E, R> {
    /// Adapter with an explicit random source for the fallback
    pub fn with_rng(engine: E, language: impl Into<String>, rng: R) -> Self {
        Self {
            engine,
            language: language.into(),
            rng: RefCell::new(rng),
            pending: Cell::new(false),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Whether an extraction is in flight
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Run the engine over `png`.
    ///
    /// Engine failures are logged and replaced by [`OcrAdapter::simulate`]; the
    /// only error returned is [`WhiteboardError::RecognitionBusy`].
    pub async fn extract_text(&self, png: &[u8]) -> Result<OcrResult> {
        let _guard = PendingGuard::acquire(&self.pending)?;

        match self.engine.recognize(png, &self.language).await {
            Ok(raw) => {
                let result = OcrResult {
                    text: raw.text.trim().to_string(),
                    confidence: percent_to_unit(raw.confidence_percent),
                    source: OcrSource::Engine,
                };
                log::info!(
                    "OcrAdapter: {} returned {} chars ({:.1}%)",
                    self.engine.name(),
                    result.text.len(),
                    raw.confidence_percent
                );
                Ok(result)
            }
            Err(err) => {
                log::warn!("OcrAdapter: {} failed, using simulated text: {}", self.engine.name(), err);
                Ok(self.simulate())
            }
        }
    }

    /// Canned stand-in result
    pub fn simulate(&self) -> OcrResult {
        let mut rng = self.rng.borrow_mut();
        let phrase = SAMPLE_TEXTS[rng.gen_range(0..SAMPLE_TEXTS.len())];
        let percent = rng.gen_range(SIMULATED_CONFIDENCE);

        OcrResult {
            text: format!("{}{}", SIMULATED_PREFIX, phrase),
            confidence: percent_to_unit(percent),
            source: OcrSource::Simulated,
        }
    }
}

/// Engine percentage to the canonical 0-1 scale; non-finite becomes 0
pub fn percent_to_unit(percent: f64) -> f64 {
    if percent.is_finite() {
        (percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Marks the adapter busy until dropped (also on cancellation)
struct PendingGuard<'a>(&'a Cell<bool>);

impl<'a> PendingGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Result<Self> {
        if flag.replace(true) {
            return Err(WhiteboardError::RecognitionBusy);
        }
        Ok(Self(flag))
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
