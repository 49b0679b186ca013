// Session behavior as seen through the view

use whiteboard_wasm::renderers::{DisplayList, DrawOp, Raster};
use whiteboard_wasm::{
    Color, CompositeOp, ModelStatus, Point, RecordingView, Tool, ViewEvent, WhiteboardConfig, WhiteboardError,
    WhiteboardSession,
};

fn board() -> WhiteboardSession<DisplayList, RecordingView> {
    let config = WhiteboardConfig {
        canvas_width: 50.0,
        canvas_height: 50.0,
        ..Default::default()
    };
    WhiteboardSession::new(config, DisplayList::new(), RecordingView::new()).unwrap()
}

#[test]
fn test_status_lifecycle() {
    let mut board = board();
    board.select_tool("pen").unwrap();
    board.select_color("#00AA00").unwrap();
    board.set_stroke_width(2.5).unwrap();
    board.pointer_down(Point::new(1.0, 1.0)).unwrap();
    board.pointer_up().unwrap();
    board.clear().unwrap();

    assert_eq!(
        board.view().statuses(),
        vec![
            "Ready to draw",
            "Selected pen",
            "Selected color #00aa00",
            "Stroke width: 2.5px",
            "Drawing with pen",
            "Ready to draw",
            "Canvas cleared",
        ]
    );
}

#[test]
fn test_toolbar_events() {
    let mut board = board();
    board.select_tool("eraser").unwrap();
    board.select_color("#123").unwrap();
    board.set_stroke_width(8.0).unwrap();

    let events = board.view().events();
    assert!(events.contains(&ViewEvent::Tool(Tool::Eraser)));
    assert!(events.contains(&ViewEvent::Color(Color::new(0x11, 0x22, 0x33))));
    assert!(events.contains(&ViewEvent::StrokeWidth(8.0)));
}

#[test]
fn test_eraser_stroke_style() {
    let mut board = board();
    board.select_tool("eraser").unwrap();
    board.set_stroke_width(5.0).unwrap();
    board.pointer_down(Point::new(10.0, 10.0)).unwrap();

    assert_eq!(
        board.surface().ops()[..2],
        [
            DrawOp::SetStyle {
                composite: CompositeOp::DestinationOut,
                color: Color::BLACK,
                line_width: 10.0,
            },
            DrawOp::Dot {
                center: Point::new(10.0, 10.0),
                radius: 5.0,
            },
        ]
    );
    assert_eq!(board.status(), "Drawing with eraser");
}

#[test]
fn test_brush_change_mid_stroke_applies_to_next_stroke() {
    let mut board = board();
    board.pointer_down(Point::new(0.0, 0.0)).unwrap();
    board.select_color("#ff0000").unwrap();
    board.pointer_move(Point::new(5.0, 5.0)).unwrap();
    board.pointer_up().unwrap();
    board.pointer_down(Point::new(20.0, 20.0)).unwrap();
    board.pointer_up().unwrap();

    let colors: Vec<Color> = board.paths().iter().map(|s| s.color()).collect();
    assert_eq!(colors, vec![Color::BLACK, Color::new(255, 0, 0)]);
}

#[test]
fn test_rejected_input_is_reported_as_typed_errors() {
    let mut board = board();
    assert!(matches!(board.select_tool("brush"), Err(WhiteboardError::InvalidTool(_))));
    assert!(matches!(board.select_color("#12345"), Err(WhiteboardError::InvalidColor(_))));
    assert!(matches!(board.set_stroke_width(-1.0), Err(WhiteboardError::InvalidStrokeWidth(_))));
    assert!(matches!(board.set_stroke_width(f64::INFINITY), Err(WhiteboardError::InvalidStrokeWidth(_))));
    assert_eq!(board.status(), "Ready to draw");
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = WhiteboardConfig {
        canvas_width: 0.0,
        ..Default::default()
    };
    let err = WhiteboardSession::new(config, DisplayList::new(), RecordingView::new()).unwrap_err();
    assert!(matches!(err, WhiteboardError::InvalidConfig(_)));

    let config = WhiteboardConfig {
        export_prefix: String::new(),
        ..Default::default()
    };
    assert!(WhiteboardSession::new(config, DisplayList::new(), RecordingView::new()).is_err());
}

#[test]
fn test_model_status_transitions() {
    let config = WhiteboardConfig {
        canvas_width: 20.0,
        canvas_height: 20.0,
        max_jitter: -0.5,
        ..Default::default()
    };
    let raster = Raster::from_config(&config).unwrap();
    let mut board = WhiteboardSession::new(config, raster, RecordingView::new()).unwrap();
    assert_eq!(board.model_status(), ModelStatus::Unloaded);

    let err = board.load_digit_model(Box::new(rand::rngs::mock::StepRng::new(0, 0))).unwrap_err();
    assert!(matches!(err, WhiteboardError::InvalidConfig(_)));
    assert!(matches!(board.model_status(), ModelStatus::Failed(_)));
    assert_eq!(board.status(), "Ready to draw");
}

#[test]
fn test_toggle_results_reaches_view() {
    let mut board = board();
    board.toggle_results();
    board.toggle_results();

    let toggles: Vec<&ViewEvent> = board
        .view()
        .events()
        .iter()
        .filter(|e| matches!(e, ViewEvent::Collapsed(_)))
        .collect();
    assert_eq!(toggles, vec![&ViewEvent::Collapsed(true), &ViewEvent::Collapsed(false)]);
}
