//! Completed strokes, kept so the canvas can be rebuilt from scratch
//!
//! The raster is the only real document; strokes are stored purely so a
//! resize (which throws the backing store away) can replay them.

use serde::{Deserialize, Serialize};

use super::stroke::Stroke;
use crate::error::Result;
use crate::renderers::{DrawOp, DrawingSurface, StrokeSmoother};

/// Ordered strokes, insertion order = drawing order
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PathStore {
    strokes: Vec<Stroke>,
}

impl PathStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, stroke: Stroke) {
        if stroke.is_dot() {
            log::debug!("PathStore: appending {} dot (total {})", stroke.tool(), self.strokes.len() + 1);
        } else {
            log::debug!(
                "PathStore: appending {} stroke with {} points (total {})",
                stroke.tool(),
                stroke.points().len(),
                self.strokes.len() + 1
            );
        }
        self.strokes.push(stroke);
    }

    /// Drop every stroke. There is no single-stroke undo.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stroke> {
        self.strokes.iter()
    }

    /// Replay every stroke in order through the live smoothing algorithm.
    ///
    /// The surface is not cleared first; callers clear to the background
    /// before redrawing. Leaves the surface in `source-over` mode.
    pub fn redraw_all<S: DrawingSurface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        for stroke in &self.strokes {
            StrokeSmoother::replay(surface, stroke)?;
        }
        surface.apply(&DrawOp::ResetComposite)
    }
}

impl<'a> IntoIterator for &'a PathStore {
    type Item = &'a Stroke;
    type IntoIter = std::slice::Iter<'a, Stroke>;

    fn into_iter(self) -> Self::IntoIter {
        self.strokes.iter()
    }
}
