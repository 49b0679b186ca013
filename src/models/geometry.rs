//! Canvas geometry
//!
//! Points live in logical canvas coordinates: the same stroke lands on the same
//! spot whatever the device pixel ratio of the backing store is.

use serde::{Deserialize, Serialize};

/// A recorded pointer sample in logical canvas coordinates
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`
    pub fn midpoint(self, other: Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// On-screen rectangle of the canvas element (from `getBoundingClientRect`)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Backing-store size in device pixels for a logical canvas
pub fn device_size(width: f64, height: f64, device_pixel_ratio: f64) -> (u32, u32) {
    (
        (width * device_pixel_ratio).round() as u32,
        (height * device_pixel_ratio).round() as u32,
    )
}

/// Convert a client-space pointer position into logical canvas coordinates.
///
/// The canvas may be displayed at a different size than its backing store
/// (`backing_width` x `backing_height` device pixels), so the position is first
/// scaled into backing pixels, then divided by the device pixel ratio.
pub fn canvas_point(
    client_x: f64,
    client_y: f64,
    rect: &CanvasRect,
    backing_width: f64,
    backing_height: f64,
    device_pixel_ratio: f64,
) -> Point {
    let scale_x = if rect.width > 0.0 { backing_width / rect.width } else { 1.0 };
    let scale_y = if rect.height > 0.0 { backing_height / rect.height } else { 1.0 };
    let dpr = if device_pixel_ratio > 0.0 { device_pixel_ratio } else { 1.0 };

    Point {
        x: (client_x - rect.left) * scale_x / dpr,
        y: (client_y - rect.top) * scale_y / dpr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint() {
        let mid = Point::new(0.0, 10.0).midpoint(Point::new(4.0, 2.0));
        assert_eq!(mid, Point::new(2.0, 6.0));
    }

    #[test]
    fn test_device_size_rounds() {
        assert_eq!(device_size(1200.0, 800.0, 1.0), (1200, 800));
        assert_eq!(device_size(1200.0, 800.0, 2.0), (2400, 1600));
        assert_eq!(device_size(101.0, 33.0, 1.5), (152, 50));
    }

    #[test]
    fn test_canvas_point_removes_pixel_ratio() {
        // 1200x800 logical canvas at dpr 2, displayed at its CSS size
        let rect = CanvasRect { left: 10.0, top: 20.0, width: 1200.0, height: 800.0 };
        let p = canvas_point(110.0, 220.0, &rect, 2400.0, 1600.0, 2.0);
        assert_eq!(p, Point::new(100.0, 200.0));
    }

    #[test]
    fn test_canvas_point_handles_css_scaling() {
        // Displayed at half size: a click at the visual centre maps to the logical centre
        let rect = CanvasRect { left: 0.0, top: 0.0, width: 600.0, height: 400.0 };
        let p = canvas_point(300.0, 200.0, &rect, 1200.0, 800.0, 1.0);
        assert_eq!(p, Point::new(600.0, 400.0));
    }

    #[test]
    fn test_canvas_point_degenerate_rect() {
        let rect = CanvasRect { left: 5.0, top: 5.0, width: 0.0, height: 0.0 };
        let p = canvas_point(15.0, 25.0, &rect, 1200.0, 800.0, 0.0);
        assert_eq!(p, Point::new(10.0, 20.0));
    }
}
