//! WASM build test
//!
//! Runs the session in a real browser against the canvas surface.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;
use whiteboard_wasm::renderers::{CanvasSurface, DrawingSurface};
use whiteboard_wasm::{Point, RecordingView, WhiteboardConfig, WhiteboardSession};

wasm_bindgen_test_configure!(run_in_browser);

fn canvas() -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document.create_element("canvas").unwrap();
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas.dyn_into::<HtmlCanvasElement>().unwrap()
}

fn board() -> WhiteboardSession<CanvasSurface, RecordingView> {
    let config = WhiteboardConfig {
        canvas_width: 64.0,
        canvas_height: 48.0,
        ..Default::default()
    };
    let surface = CanvasSurface::new(canvas()).unwrap();
    WhiteboardSession::new(config, surface, RecordingView::new()).unwrap()
}

#[wasm_bindgen_test]
fn test_canvas_is_sized_and_white() {
    let board = board();
    let canvas = board.surface().canvas();
    assert_eq!((canvas.width(), canvas.height()), (64, 48));

    let pixels = board.surface().read_pixels().unwrap();
    assert_eq!(pixels.pixel(0, 0), Some([255, 255, 255, 255]));
}

#[wasm_bindgen_test]
fn test_blank_canvas_recognizes_one() {
    let mut board = board();
    board.load_digit_model(Box::new(rand::rngs::mock::StepRng::new(0, 0))).unwrap();
    assert_eq!(board.recognize_digit().unwrap().digit, 1);
}

#[wasm_bindgen_test]
fn test_drawing_marks_canvas() {
    let mut board = board();
    board.set_stroke_width(6.0).unwrap();
    board.pointer_down(Point::new(30.0, 20.0)).unwrap();
    board.pointer_up().unwrap();

    let pixels = board.surface().read_pixels().unwrap();
    let [r, g, b, a] = pixels.pixel(30, 20).unwrap();
    assert!(r < 50 && g < 50 && b < 50 && a > 200);
}

#[wasm_bindgen_test]
fn test_js_error_carries_context() {
    let err = whiteboard_wasm::api::helpers::to_js_error("Export", whiteboard_wasm::WhiteboardError::EmptyStroke);
    let message = err.as_string().unwrap();
    assert!(message.starts_with("Export: "));
}

#[wasm_bindgen_test]
fn test_canvas_export_is_png_of_readback() {
    let mut board = board();
    board.set_stroke_width(6.0).unwrap();
    board.pointer_down(Point::new(30.0, 20.0)).unwrap();
    board.pointer_up().unwrap();

    let image = board.export().unwrap();
    let decoded = whiteboard_wasm::renderers::PixelBuffer::decode_png(&image.png).unwrap();
    assert_eq!(decoded, board.surface().read_pixels().unwrap());
}
