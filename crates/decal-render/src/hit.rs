//! Hit testing: point → element lookup.
//!
//! Walks the overlays front-to-back (last painted = topmost) to find which
//! element is under a canvas position.

use decal_core::{ElementId, Point, SceneGraph};

/// Find the topmost element containing (px, py).
/// Returns `None` if only the background is hit.
pub fn hit_test(scene: &SceneGraph, px: f64, py: f64) -> Option<ElementId> {
    let p = Point::new(px, py);
    scene
        .elements()
        .iter()
        .rev()
        .find(|el| contains_inclusive(el.bounds(), p))
        .map(|el| el.id)
}

// kurbo's `Rect::contains` excludes the far edges; a press on the last
// pixel column of an element should still grab it.
fn contains_inclusive(r: decal_core::Rect, p: Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}
