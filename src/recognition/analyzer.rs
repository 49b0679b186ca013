//! Digit pattern analysis
//!
//! Single pass over an RGBA buffer counting "ink" pixels and where they sit.

use crate::config::{WhiteboardConfig, DEFAULT_DARK_THRESHOLD};
use crate::error::{Result, WhiteboardError};
use crate::models::FeatureVector;
use crate::renderers::PixelBuffer;

/// Extracts a [`FeatureVector`] from rendered pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatternAnalyzer {
    /// Pixels with mean RGB strictly below this are dark
    dark_threshold: f64,
    /// Central window, as fractions of width and height (exclusive bounds)
    center_window: (f64, f64),
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self {
            dark_threshold: DEFAULT_DARK_THRESHOLD,
            center_window: (0.3, 0.7),
        }
    }
}

impl PatternAnalyzer {
    pub fn from_config(config: &WhiteboardConfig) -> Result<Self> {
        config.validate_recognition()?;
        Ok(Self {
            dark_threshold: config.dark_threshold,
            center_window: config.center_window,
        })
    }

    pub fn analyze_buffer(&self, pixels: &PixelBuffer) -> Result<FeatureVector> {
        self.analyze(pixels.as_bytes(), pixels.width(), pixels.height())
    }

    /// Scan `pixels` (`width * height * 4` bytes of RGBA).
    ///
    /// Pixels on the horizontal or vertical midline belong to neither half.
    /// Transparent pixels are composited over the white page first, so erased
    /// areas read as background.
    pub fn analyze(&self, pixels: &[u8], width: u32, height: u32) -> Result<FeatureVector> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(WhiteboardError::InvalidRaster {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        let (w, h) = (width as f64, height as f64);
        let (mid_x, mid_y) = (w / 2.0, h / 2.0);
        let (low, high) = self.center_window;
        let (center_x, center_y) = ((w * low, w * high), (h * low, h * high));

        let mut dark = 0usize;
        let (mut top, mut bottom, mut left, mut right, mut center) = (0usize, 0usize, 0usize, 0usize, 0usize);

        for (index, px) in pixels.chunks_exact(4).enumerate() {
            if brightness(px) >= self.dark_threshold {
                continue;
            }
            dark += 1;

            let x = (index % width as usize) as f64;
            let y = (index / width as usize) as f64;
            if y < mid_y {
                top += 1;
            }
            if y > mid_y {
                bottom += 1;
            }
            if x < mid_x {
                left += 1;
            }
            if x > mid_x {
                right += 1;
            }
            if x > center_x.0 && x < center_x.1 && y > center_y.0 && y < center_y.1 {
                center += 1;
            }
        }

        let total = pixels.len() / 4;
        let of_dark = |count: usize| if dark == 0 { 0.0 } else { count as f64 / dark as f64 };

        let features = FeatureVector {
            density: if total == 0 { 0.0 } else { dark as f64 / total as f64 },
            top_heavy: of_dark(top),
            bottom_heavy: of_dark(bottom),
            left_heavy: of_dark(left),
            right_heavy: of_dark(right),
            center_density: of_dark(center),
        };
        log::debug!("PatternAnalyzer: {}x{} -> {:?}", width, height, features);
        Ok(features)
    }
}

/// Mean of R, G, B after compositing over white
fn brightness(px: &[u8]) -> f64 {
    let alpha = px[3] as f64 / 255.0;
    let over_white = |c: u8| c as f64 * alpha + 255.0 * (1.0 - alpha);
    (over_white(px[0]) + over_white(px[1]) + over_white(px[2])) / 3.0
}
