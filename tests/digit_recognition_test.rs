// Digit recognition from rendered pixels

use rand::rngs::mock::StepRng;
use whiteboard_wasm::recognition::{DigitRecognizer, HeuristicClassifier, PatternAnalyzer};
use whiteboard_wasm::renderers::{PixelBuffer, Raster};
use whiteboard_wasm::{
    Point, RecordingView, ShapeRule, ViewEvent, WhiteboardConfig, WhiteboardError, WhiteboardSession,
};

const INK: [u8; 4] = [0, 0, 0, 255];
const PAPER: [u8; 4] = [255, 255, 255, 255];

fn zero_jitter() -> Box<StepRng> {
    Box::new(StepRng::new(0, 0))
}

fn board() -> WhiteboardSession<Raster, RecordingView> {
    let config = WhiteboardConfig {
        canvas_width: 40.0,
        canvas_height: 30.0,
        ..Default::default()
    };
    let raster = Raster::from_config(&config).unwrap();
    WhiteboardSession::new(config, raster, RecordingView::new()).unwrap()
}

#[test]
fn test_blank_canvas_is_a_confident_one() {
    let mut board = board();
    board.load_digit_model(zero_jitter()).unwrap();

    let result = board.recognize_digit().unwrap();
    assert_eq!(result.digit, 1);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.rule, ShapeRule::Sparse);
    assert!(result.distribution.values().iter().enumerate().all(|(d, &v)| d == 1 || v == 0.0));
}

#[test]
fn test_top_heavy_shape_reads_as_nine() {
    // Block in the top half whose lowest row reaches into the centre window
    let mut pixels = PixelBuffer::filled(10, 10, PAPER);
    for y in 0..=4 {
        for x in 4..=6 {
            pixels.set_pixel(x, y, INK);
        }
    }

    let features = PatternAnalyzer::default().analyze_buffer(&pixels).unwrap();
    assert!((features.density - 0.15).abs() < 1e-12);
    assert_eq!(features.top_heavy, 1.0);
    assert!((features.center_density - 0.2).abs() < 1e-12);

    let result = HeuristicClassifier::new(StepRng::new(0, 0)).predict(&features);
    assert_eq!(result.rule, ShapeRule::TopHeavy);
    assert_eq!(result.digit, 9);
    assert!((result.confidence - 0.7 / 1.2).abs() < 1e-12);
    assert_eq!(result.top_predictions[1].digit, 6);
}

#[test]
fn test_drawn_strokes_give_valid_distribution() {
    let mut board = board();
    board.load_digit_model(Box::new(rand::rngs::mock::StepRng::new(1 << 60, 1 << 58))).unwrap();

    board.set_stroke_width(4.0).unwrap();
    board.pointer_down(Point::new(10.0, 5.0)).unwrap();
    for (x, y) in [(20.0, 4.0), (30.0, 6.0), (28.0, 14.0), (18.0, 20.0), (12.0, 26.0), (30.0, 26.0)] {
        board.pointer_move(Point::new(x, y)).unwrap();
    }
    board.pointer_up().unwrap();

    let result = board.recognize_digit().unwrap();
    assert!((result.distribution.sum() - 1.0).abs() < 1e-9);
    for ratio in result.features.ratios() {
        assert!((0.0..=1.0).contains(&ratio));
    }
    assert_eq!(result.top_predictions.len(), 3);
    assert!(result.top_predictions.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    assert!(board.view().events().contains(&ViewEvent::Digit(result)));
}

#[test]
fn test_same_features_same_rule() {
    let mut board = board();
    board.pointer_down(Point::new(20.0, 15.0)).unwrap();
    board.pointer_up().unwrap();
    let pixels = board.surface().pixels();

    let analyzer = PatternAnalyzer::default();
    let first = analyzer.analyze_buffer(&pixels).unwrap();
    let second = analyzer.analyze_buffer(&pixels).unwrap();
    assert_eq!(first, second);
    assert_eq!(ShapeRule::select(&first), ShapeRule::select(&second));
}

#[test]
fn test_model_load_failure_is_recoverable() {
    let config = WhiteboardConfig {
        center_window: (0.8, 0.2),
        ..Default::default()
    };
    assert!(DigitRecognizer::load(&config, zero_jitter()).is_err());

    let mut board = board();
    assert!(matches!(board.recognize_digit(), Err(WhiteboardError::ModelUnavailable)));
    board.load_digit_model(zero_jitter()).unwrap();
    assert!(board.recognize_digit().is_ok());
}
