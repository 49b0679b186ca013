// Text extraction through the OCR adapter and the session

use std::cell::RefCell;

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::block_on;
use rand::rngs::StdRng;
use rand::SeedableRng;
use whiteboard_wasm::recognition::ocr::{SAMPLE_TEXTS, SIMULATED_PREFIX};
use whiteboard_wasm::recognition::{EngineText, OcrAdapter, OcrEngine};
use whiteboard_wasm::renderers::{PixelBuffer, Raster};
use whiteboard_wasm::{
    OcrSource, RecordingView, ResultPanel, ViewEvent, WhiteboardConfig, WhiteboardError, WhiteboardSession,
};

/// Engine whose script never loaded
struct MissingEngine;

#[async_trait(?Send)]
impl OcrEngine for MissingEngine {
    async fn recognize(&self, _png: &[u8], _language: &str) -> whiteboard_wasm::Result<EngineText> {
        Err(WhiteboardError::Ocr("Tesseract is not defined".to_string()))
    }
}

/// Engine that reports the size of the PNG it was given
struct SizeEngine;

#[async_trait(?Send)]
impl OcrEngine for SizeEngine {
    async fn recognize(&self, png: &[u8], language: &str) -> whiteboard_wasm::Result<EngineText> {
        let image = PixelBuffer::decode_png(png)?;
        Ok(EngineText {
            text: format!(" {}x{} {} \n", image.width(), image.height(), language),
            confidence_percent: 64.0,
        })
    }
}

/// Engine that waits until the test opens the gate
struct GatedEngine {
    gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl GatedEngine {
    fn new() -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        (Self { gate: RefCell::new(Some(rx)) }, tx)
    }
}

#[async_trait(?Send)]
impl OcrEngine for GatedEngine {
    async fn recognize(&self, _png: &[u8], _language: &str) -> whiteboard_wasm::Result<EngineText> {
        let gate = self.gate.borrow_mut().take();
        match gate {
            Some(rx) => rx.await.map_err(|_| WhiteboardError::Ocr("gate dropped".to_string()))?,
            None => return Err(WhiteboardError::Ocr("gate already used".to_string())),
        }
        Ok(EngineText {
            text: "gated".to_string(),
            confidence_percent: 91.0,
        })
    }
}

fn board() -> WhiteboardSession<Raster, RecordingView> {
    let config = WhiteboardConfig {
        canvas_width: 32.0,
        canvas_height: 24.0,
        ..Default::default()
    };
    let raster = Raster::from_config(&config).unwrap();
    WhiteboardSession::new(config, raster, RecordingView::new()).unwrap()
}

#[test]
fn test_engine_failure_falls_back_to_demo_text() {
    let adapter = OcrAdapter::with_rng(MissingEngine, "eng", StdRng::seed_from_u64(11));
    let mut board = board();

    let result = block_on(board.extract_text(&adapter)).unwrap();
    assert_eq!(result.source, OcrSource::Simulated);
    assert!(result.text.starts_with(SIMULATED_PREFIX));
    assert!(SAMPLE_TEXTS.contains(&&result.text[SIMULATED_PREFIX.len()..]));
    assert!(result.confidence >= 0.75 && result.confidence < 0.95);

    assert_eq!(board.status(), "OCR simulation complete");
    let events = board.view().events();
    assert!(events.contains(&ViewEvent::Loading(ResultPanel::Ocr, true)));
    assert!(events.contains(&ViewEvent::Loading(ResultPanel::Ocr, false)));
    assert!(events.contains(&ViewEvent::Ocr(result)));
}

#[test]
fn test_engine_receives_canvas_png() {
    let adapter = OcrAdapter::with_rng(SizeEngine, "deu", StdRng::seed_from_u64(0));
    let mut board = board();

    let result = block_on(board.extract_text(&adapter)).unwrap();
    assert_eq!(result.text, "32x24 deu");
    assert_eq!(result.confidence, 0.64);
    assert_eq!(result.source, OcrSource::Engine);
    assert_eq!(board.status(), "Text extraction complete");
}

#[test]
fn test_second_request_is_rejected_while_pending() {
    let (engine, gate) = GatedEngine::new();
    let adapter = OcrAdapter::with_rng(engine, "eng", StdRng::seed_from_u64(0));

    block_on(async {
        let mut first = Box::pin(adapter.extract_text(b"png"));
        assert!(futures::poll!(first.as_mut()).is_pending());
        assert!(adapter.is_pending());

        let second = adapter.extract_text(b"png").await;
        assert!(matches!(second, Err(WhiteboardError::RecognitionBusy)));

        gate.send(()).unwrap();
        let result = first.await.unwrap();
        assert_eq!(result.text, "gated");
        assert!((result.confidence - 0.91).abs() < 1e-12);
    });
    assert!(!adapter.is_pending());
}

#[test]
fn test_session_reports_busy_adapter() {
    let (engine, _gate) = GatedEngine::new();
    let adapter = OcrAdapter::with_rng(engine, "eng", StdRng::seed_from_u64(0));
    let mut board = board();

    block_on(async {
        let mut first = Box::pin(adapter.extract_text(b"png"));
        assert!(futures::poll!(first.as_mut()).is_pending());

        let err = board.extract_text(&adapter).await.unwrap_err();
        assert!(matches!(err, WhiteboardError::RecognitionBusy));
    });
    assert_eq!(board.status(), "Error: Text extraction already in progress");
}

#[test]
fn test_dropped_request_releases_adapter() {
    let (engine, _gate) = GatedEngine::new();
    let adapter = OcrAdapter::with_rng(engine, "eng", StdRng::seed_from_u64(0));

    block_on(async {
        let mut first = Box::pin(adapter.extract_text(b"png"));
        assert!(futures::poll!(first.as_mut()).is_pending());
        drop(first);
    });
    assert!(!adapter.is_pending());

    // The gate is spent, so the engine now fails and the fallback answers
    let result = block_on(adapter.extract_text(b"png")).unwrap();
    assert!(result.is_simulated());
}
