//! Recognition pipeline
//!
//! - `analyzer`: raster → [`FeatureVector`](crate::models::FeatureVector)
//! - `classifier`: feature vector → confidence over the ten digits
//! - `ocr`: raster → text through an [`OcrEngine`], simulated on failure
//! - `tesseract`: the browser OCR engine (Tesseract.js)

pub mod analyzer;
pub mod classifier;
pub mod ocr;
pub mod tesseract;

pub use analyzer::PatternAnalyzer;
pub use classifier::{DigitRecognizer, HeuristicClassifier};
pub use ocr::{EngineText, OcrAdapter, OcrEngine};
pub use tesseract::TesseractEngine;
