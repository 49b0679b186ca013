//! Freehand stroke smoothing
//!
//! Raw pointer samples are joined with quadratic Bézier segments: for the
//! latest three samples `(p0, p1, p2)`, `p1` is the control point and the
//! midpoint of `p1`/`p2` the end point. Each segment starts where the previous
//! one ended, so consecutive segments share a tangent at the join.
//!
//! The curve always trails the pointer by one sample: the newest point only
//! becomes part of the line when the next one arrives. Redraw relies on this
//! exact behaviour, so pointer-up does not flush the tail.

use super::{DrawOp, DrawingSurface};
use crate::error::Result;
use crate::models::{Point, Stroke, StrokeStyle};

/// Live state of the stroke under the pointer
#[derive(Clone, Debug)]
pub struct StrokeSmoother {
    style: StrokeStyle,
    points: Vec<Point>,
    /// Where the next segment starts
    pen: Point,
}

impl StrokeSmoother {
    /// Start a stroke at the pointer-down sample: set up the style, drop a dot
    /// of half the line width and park the pen there.
    pub fn begin<S: DrawingSurface + ?Sized>(
        surface: &mut S,
        style: StrokeStyle,
        start: Point,
    ) -> Result<Self> {
        let smoother = Self {
            style,
            points: vec![start],
            pen: start,
        };
        for op in smoother.start_ops() {
            surface.apply(&op)?;
        }
        Ok(smoother)
    }

    /// Record a new sample and draw whatever segment it completes
    pub fn extend<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S, point: Point) -> Result<()> {
        for op in self.push(point) {
            surface.apply(&op)?;
        }
        Ok(())
    }

    /// Finish the gesture and hand over the recorded stroke
    pub fn finish(self) -> Result<Stroke> {
        Stroke::new(self.points, self.style)
    }

    /// Draw a stored stroke exactly as it was drawn live
    pub fn replay<S: DrawingSurface + ?Sized>(surface: &mut S, stroke: &Stroke) -> Result<()> {
        let Some((&first, rest)) = stroke.points().split_first() else {
            return Ok(());
        };

        let mut smoother = Self::begin(surface, stroke.style(), first)?;
        for &point in rest {
            smoother.extend(surface, point)?;
        }
        Ok(())
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Current pen position (end of the last drawn segment)
    pub fn pen(&self) -> Point {
        self.pen
    }

    fn start_ops(&self) -> Vec<DrawOp> {
        let line_width = self.style.line_width();
        vec![
            DrawOp::SetStyle {
                composite: self.style.composite(),
                color: self.style.color,
                line_width,
            },
            DrawOp::Dot {
                center: self.pen,
                radius: line_width / 2.0,
            },
            DrawOp::BeginPath,
            DrawOp::MoveTo { point: self.pen },
        ]
    }

    fn push(&mut self, point: Point) -> Vec<DrawOp> {
        self.points.push(point);

        // Two samples are not enough for a control point yet
        let n = self.points.len();
        if n < 3 {
            return Vec::new();
        }

        let (p1, p2) = (self.points[n - 2], self.points[n - 1]);
        let end = p1.midpoint(p2);
        self.pen = end;
        vec![
            DrawOp::QuadraticTo { control: p1, end },
            DrawOp::Stroke,
            DrawOp::BeginPath,
            DrawOp::MoveTo { point: end },
        ]
    }
}
