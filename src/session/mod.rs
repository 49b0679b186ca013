//! Whiteboard session
//!
//! Owns everything a page needs between events: the stroke store, the stroke
//! being drawn, the brush, the digit model and the status line. It draws
//! through a [`DrawingSurface`] and reports through a [`WhiteboardView`], so
//! the same session runs against a browser canvas or a software raster.

pub mod view;

pub use view::{RecordingView, ResultPanel, ViewEvent, WhiteboardView};

use chrono::Utc;
use rand::RngCore;

use crate::config::WhiteboardConfig;
use crate::error::{Result, WhiteboardError};
use crate::export::{export_filename, now_millis, ExportedImage};
use crate::models::{validate_stroke_width, Color, DigitResult, OcrResult, PathStore, Point, StrokeStyle, Tool};
use crate::recognition::{DigitRecognizer, OcrAdapter, OcrEngine};
use crate::renderers::{DrawingSurface, StrokeSmoother};
use crate::utils::{format_width, PerformanceMonitor};

pub const STATUS_READY: &str = "Ready to draw";
/// How long an error stays on the status line, in milliseconds
pub const ERROR_STATUS_MS: i64 = 3000;

/// Operation name for digit scan timings
const DIGIT_SCAN: &str = "digit_scan";

/// Where the digit model stands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelStatus {
    Unloaded,
    Ready,
    Failed(String),
}

enum DigitModel {
    Unloaded,
    Ready(Box<DigitRecognizer>),
    Failed(String),
}

pub struct WhiteboardSession<S, V> {
    config: WhiteboardConfig,
    surface: S,
    view: V,
    paths: PathStore,
    style: StrokeStyle,
    /// Stroke between pointer-down and pointer-up
    active: Option<StrokeSmoother>,
    model: DigitModel,
    results_collapsed: bool,
    status: String,
    /// When the current error went up, epoch millis
    error_shown_at: Option<i64>,
    performance: PerformanceMonitor,
}

impl<S, V> std::fmt::Debug for WhiteboardSession<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhiteboardSession")
            .field("config", &self.config)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl<S: DrawingSurface, V: WhiteboardView> WhiteboardSession<S, V> {
    /// Size and clear `surface`, pick up the default brush
    pub fn new(config: WhiteboardConfig, mut surface: S, view: V) -> Result<Self> {
        config.validate_canvas()?;
        let style = config.default_style()?;

        surface.resize(config.canvas_width, config.canvas_height, config.device_pixel_ratio)?;
        surface.clear(config.background)?;

        let mut session = Self {
            config,
            surface,
            view,
            paths: PathStore::new(),
            style,
            active: None,
            model: DigitModel::Unloaded,
            results_collapsed: false,
            status: String::new(),
            error_shown_at: None,
            performance: PerformanceMonitor::new(),
        };
        session.set_status(STATUS_READY);
        log::info!("WhiteboardSession: {}x{} canvas ready", session.config.canvas_width, session.config.canvas_height);
        Ok(session)
    }

    /// Bring up the digit recognizer with `rng` as its jitter source.
    ///
    /// On failure recognition stays unavailable until a later call succeeds;
    /// drawing is unaffected.
    pub fn load_digit_model(&mut self, rng: Box<dyn RngCore>) -> Result<()> {
        self.set_status("Loading digit recognition model...");
        match DigitRecognizer::load(&self.config, rng) {
            Ok(recognizer) => {
                self.model = DigitModel::Ready(Box::new(recognizer));
                self.set_status("Digit recognition model ready");
                Ok(())
            }
            Err(err) => {
                log::warn!("WhiteboardSession: digit model failed to load: {}", err);
                self.model = DigitModel::Failed(err.to_string());
                self.set_status(STATUS_READY);
                Err(err)
            }
        }
    }

    pub fn model_status(&self) -> ModelStatus {
        match &self.model {
            DigitModel::Unloaded => ModelStatus::Unloaded,
            DigitModel::Ready(_) => ModelStatus::Ready,
            DigitModel::Failed(reason) => ModelStatus::Failed(reason.clone()),
        }
    }

    // ---- drawing ----

    /// Start a stroke. A stroke still open (missed pointer-up) is committed first.
    pub fn pointer_down(&mut self, point: Point) -> Result<()> {
        if self.active.is_some() {
            self.pointer_up()?;
        }
        let smoother = StrokeSmoother::begin(&mut self.surface, self.style, point)?;
        self.active = Some(smoother);
        self.set_status(&format!("Drawing with {}", self.style.tool));
        Ok(())
    }

    /// Extend the open stroke; ignored when no button is down
    pub fn pointer_move(&mut self, point: Point) -> Result<()> {
        if let Some(smoother) = self.active.as_mut() {
            smoother.extend(&mut self.surface, point)?;
        }
        Ok(())
    }

    /// Finish the open stroke and store it
    pub fn pointer_up(&mut self) -> Result<()> {
        let Some(smoother) = self.active.take() else {
            return Ok(());
        };
        let stroke = smoother.finish()?;
        self.paths.append(stroke);
        self.set_status(STATUS_READY);
        Ok(())
    }

    /// Pointer left the canvas; ends the stroke like a release
    pub fn pointer_leave(&mut self) -> Result<()> {
        self.pointer_up()
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    // ---- brush ----

    /// Applies to the next stroke; an open stroke keeps its style
    pub fn set_tool(&mut self, tool: Tool) {
        self.style.tool = tool;
        self.view.set_active_tool(tool);
        self.set_status(&format!("Selected {}", tool));
    }

    pub fn select_tool(&mut self, name: &str) -> Result<()> {
        let tool = name.parse()?;
        self.set_tool(tool);
        Ok(())
    }

    pub fn set_color(&mut self, color: Color) {
        self.style.color = color;
        self.view.set_active_color(color);
        self.set_status(&format!("Selected color {}", color));
    }

    pub fn select_color(&mut self, css: &str) -> Result<()> {
        let color = css.parse()?;
        self.set_color(color);
        Ok(())
    }

    pub fn set_stroke_width(&mut self, width: f64) -> Result<()> {
        validate_stroke_width(width)?;
        self.style.stroke_width = width;
        self.view.set_stroke_width(width);
        self.set_status(&format!("Stroke width: {}px", format_width(width)));
        Ok(())
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    // ---- canvas ----

    /// Wipe the canvas, forget every stroke and hide the results
    pub fn clear(&mut self) -> Result<()> {
        self.active = None;
        self.paths.clear();
        self.surface.clear(self.config.background)?;
        self.view.hide_results();
        self.set_status("Canvas cleared");
        Ok(())
    }

    /// Repaint the background and replay every stored stroke
    pub fn redraw(&mut self) -> Result<()> {
        self.surface.clear(self.config.background)?;
        self.paths.redraw_all(&mut self.surface)
    }

    /// Rebuild the surface for a new device pixel ratio and redraw.
    /// An open stroke is committed first so it survives.
    pub fn resize(&mut self, device_pixel_ratio: f64) -> Result<()> {
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return Err(WhiteboardError::InvalidConfig(format!(
                "device pixel ratio must be positive, got {}",
                device_pixel_ratio
            )));
        }
        self.pointer_up()?;

        self.config.device_pixel_ratio = device_pixel_ratio;
        self.surface.resize(self.config.canvas_width, self.config.canvas_height, device_pixel_ratio)?;
        self.redraw()?;
        log::debug!("WhiteboardSession: resized to dpr {}", device_pixel_ratio);
        Ok(())
    }

    // ---- recognition ----

    /// Classify what is on the canvas
    pub fn recognize_digit(&mut self) -> Result<DigitResult> {
        if !matches!(self.model, DigitModel::Ready(_)) {
            self.show_error("Digit recognition model not loaded");
            return Err(WhiteboardError::ModelUnavailable);
        }

        self.view.set_loading(ResultPanel::Digit, true);
        self.set_status("Recognizing digit...");

        let started = Utc::now();
        let outcome = self.surface.read_pixels().and_then(|pixels| match &mut self.model {
            DigitModel::Ready(recognizer) => recognizer.recognize(&pixels),
            _ => Err(WhiteboardError::ModelUnavailable),
        });
        let elapsed = self.performance.record_since(DIGIT_SCAN, started);
        self.view.set_loading(ResultPanel::Digit, false);

        match outcome {
            Ok(result) => {
                log::debug!(
                    "WhiteboardSession: digit scan took {:.1}ms (average {:.1}ms over {})",
                    elapsed,
                    self.performance.get_average_time(DIGIT_SCAN).unwrap_or(elapsed),
                    self.performance.count(DIGIT_SCAN)
                );
                self.view.show_digit_result(&result);
                self.set_status("Digit recognition complete");
                Ok(result)
            }
            Err(err) => {
                log::error!("WhiteboardSession: digit recognition failed: {}", err);
                self.show_error("Failed to recognize digit");
                Err(err)
            }
        }
    }

    /// First half of text extraction: show progress and grab the PNG
    pub fn begin_text_extraction(&mut self) -> Result<Vec<u8>> {
        self.view.set_loading(ResultPanel::Ocr, true);
        self.set_status("Extracting text...");

        self.surface.encode_png().map_err(|err| {
            log::error!("WhiteboardSession: canvas encoding failed: {}", err);
            self.view.set_loading(ResultPanel::Ocr, false);
            self.show_error("Failed to extract text");
            err
        })
    }

    /// Second half of text extraction: present what the adapter returned
    pub fn finish_text_extraction(&mut self, outcome: Result<OcrResult>) -> Result<OcrResult> {
        self.view.set_loading(ResultPanel::Ocr, false);
        match outcome {
            Ok(result) => {
                self.view.show_ocr_result(&result);
                if result.is_simulated() {
                    self.set_status("OCR simulation complete");
                } else {
                    self.set_status("Text extraction complete");
                }
                Ok(result)
            }
            Err(err) => {
                log::error!("WhiteboardSession: text extraction failed: {}", err);
                self.show_error("Failed to extract text");
                Err(err)
            }
        }
    }

    /// Run `adapter` over the canvas. Rejected while another extraction is pending.
    pub async fn extract_text<E, R>(&mut self, adapter: &OcrAdapter<E, R>) -> Result<OcrResult>
    where
        E: OcrEngine,
        R: RngCore,
    {
        if adapter.is_pending() {
            self.show_error("Text extraction already in progress");
            return Err(WhiteboardError::RecognitionBusy);
        }
        let png = self.begin_text_extraction()?;
        let outcome = adapter.extract_text(&png).await;
        self.finish_text_extraction(outcome)
    }

    /// Engine progress, fraction in 0-1
    pub fn report_ocr_progress(&mut self, fraction: f64) {
        let percent = (fraction.clamp(0.0, 1.0) * 100.0).round();
        self.set_status(&format!("OCR Progress: {}%", percent));
    }

    // ---- export / panel ----

    /// PNG of the canvas, named after `timestamp_millis`
    pub fn export_at(&mut self, timestamp_millis: i64) -> Result<ExportedImage> {
        let png = self.surface.encode_png()?;
        let image = ExportedImage {
            filename: export_filename(&self.config.export_prefix, timestamp_millis),
            png,
        };
        self.set_status("Canvas exported");
        Ok(image)
    }

    pub fn export(&mut self) -> Result<ExportedImage> {
        self.export_at(now_millis())
    }

    /// Collapse or expand the results panel; returns the new collapsed state
    pub fn toggle_results(&mut self) -> bool {
        self.results_collapsed = !self.results_collapsed;
        self.view.set_results_collapsed(self.results_collapsed);
        self.results_collapsed
    }

    pub fn results_collapsed(&self) -> bool {
        self.results_collapsed
    }

    // ---- status ----

    pub fn status(&self) -> &str {
        self.status_at(now_millis())
    }

    /// Status line as of `now` (epoch millis); errors fall back to ready once expired
    pub fn status_at(&self, now: i64) -> &str {
        match self.error_shown_at {
            Some(shown) if now - shown >= ERROR_STATUS_MS => STATUS_READY,
            _ => &self.status,
        }
    }

    pub fn show_error(&mut self, message: &str) {
        self.status = format!("Error: {}", message);
        self.error_shown_at = Some(now_millis());
        self.view.show_error(message);
    }

    fn set_status(&mut self, message: &str) {
        log::debug!("status: {}", message);
        self.status = message.to_string();
        self.error_shown_at = None;
        self.view.show_status(message);
    }

    // ---- accessors ----

    pub fn config(&self) -> &WhiteboardConfig {
        &self.config
    }

    pub fn paths(&self) -> &PathStore {
        &self.paths
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn performance(&self) -> &PerformanceMonitor {
        &self.performance
    }
}
