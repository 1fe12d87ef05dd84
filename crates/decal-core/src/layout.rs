//! Canvas geometry: bounds clamping, placement defaults, and text metrics.

use crate::model::FontSpec;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// The editing canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1080.0,
            height: 1920.0,
        }
    }
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Clamp a top-left position so a box of `size` stays inside the canvas.
    ///
    /// A box wider (or taller) than the canvas is pinned to 0 on that axis.
    /// Non-finite coordinates collapse to 0.
    pub fn clamp(&self, position: Point, size: Size) -> Point {
        Point::new(
            clamp_axis(position.x, size.width, self.width),
            clamp_axis(position.y, size.height, self.height),
        )
    }

    /// Top-left position that centers a box of `size` on the canvas.
    pub fn centered(&self, size: Size) -> Point {
        self.clamp(
            Point::new(
                (self.width - size.width) / 2.0,
                (self.height - size.height) / 2.0,
            ),
            size,
        )
    }
}

fn clamp_axis(value: f64, extent: f64, limit: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let max = (limit - extent).max(0.0);
    value.clamp(0.0, max)
}

/// Where newly added elements land.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Padding added around measured text on every side.
    pub text_padding: f64,
    /// Top-left offset for new images, so repeated adds don't stack exactly
    /// on the centered text.
    pub image_offset: Point,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            text_padding: 8.0,
            image_offset: Point::new(100.0, 100.0),
        }
    }
}

// ─── Text metrics ────────────────────────────────────────────────────────

/// Measures the intrinsic size of a text run.
///
/// The browser build measures with `CanvasRenderingContext2d::measureText`;
/// native builds and tests use [`EstimatedMetrics`].
pub trait TextMeasure {
    /// Size of `content` rendered in `font`, without padding.
    fn measure(&self, content: &str, font: &FontSpec) -> Size;
}

/// Fixed-ratio estimate: average glyph advance of 0.6em, 1.2em line height.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMetrics;

impl TextMeasure for EstimatedMetrics {
    fn measure(&self, content: &str, font: &FontSpec) -> Size {
        let lines = content.split('\n');
        let (count, widest) = lines.fold((0usize, 0usize), |(n, w), line| {
            (n + 1, w.max(line.chars().count()))
        });
        Size::new(
            widest as f64 * font.size * 0.6,
            count.max(1) as f64 * font.size * 1.2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Viewport = Viewport::new(1080.0, 1920.0);

    #[test]
    fn clamp_negative_to_origin() {
        let p = CANVAS.clamp(Point::new(-500.0, -500.0), Size::new(150.0, 150.0));
        assert_eq!(p, Point::ORIGIN);
    }

    #[test]
    fn clamp_keeps_far_edge_inside() {
        let p = CANVAS.clamp(Point::new(5000.0, 1900.0), Size::new(150.0, 150.0));
        assert_eq!(p, Point::new(930.0, 1770.0));
    }

    #[test]
    fn oversized_box_pins_to_origin() {
        let p = CANVAS.clamp(Point::new(40.0, 40.0), Size::new(2000.0, 10.0));
        assert_eq!(p, Point::new(0.0, 40.0));
    }

    #[test]
    fn nan_collapses_to_zero() {
        let p = CANVAS.clamp(Point::new(f64::NAN, 12.0), Size::new(10.0, 10.0));
        assert_eq!(p, Point::new(0.0, 12.0));
    }

    #[test]
    fn estimated_metrics_multiline() {
        let font = FontSpec::new("Roboto", 10.0);
        let size = EstimatedMetrics.measure("ab\nabcd", &font);
        assert!((size.width - 24.0).abs() < 1e-9);
        assert!((size.height - 24.0).abs() < 1e-9);
    }
}
