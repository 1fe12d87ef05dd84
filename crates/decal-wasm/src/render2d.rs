//! Canvas2D renderer for render trees.
//!
//! Paints the background and every overlay bottom-to-top onto a
//! `CanvasRenderingContext2d`. The same routine drives the live surface
//! (with a selection outline) and the export flattener (without).

use decal_render::{RenderContent, RenderItem, RenderTree};
use std::collections::HashMap;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

const SELECTION_COLOR: &str = "#4FC3F7";
const BLANK: &str = "#FFFFFF";
const PLACEHOLDER: &str = "rgba(142, 142, 147, 0.15)";

/// Decoded `<img>` elements keyed by URI.
#[derive(Default)]
pub struct ImageCache {
    images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
    /// Start loading `src` if it is not already cached.
    pub fn request(&mut self, src: &str) {
        if self.images.contains_key(src) {
            return;
        }
        let Ok(img) = HtmlImageElement::new() else {
            log::warn!("could not create image element for `{src}`");
            return;
        };
        img.set_cross_origin(Some("anonymous"));
        img.set_src(src);
        self.images.insert(src.to_string(), img);
    }

    /// The image for `src`, once fully decoded.
    pub fn ready(&self, src: &str) -> Option<&HtmlImageElement> {
        self.images
            .get(src)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }

    pub fn request_all(&mut self, tree: &RenderTree) {
        for src in tree.image_sources() {
            self.request(src);
        }
    }
}

/// Paint `tree` at 1:1 logical scale. Images not yet decoded are drawn as
/// placeholders; their URIs are returned.
pub fn paint_tree<'t>(
    ctx: &CanvasRenderingContext2d,
    tree: &'t RenderTree,
    images: &ImageCache,
    show_selection: bool,
) -> Vec<&'t str> {
    let (w, h) = (tree.canvas.width, tree.canvas.height);
    let mut missing = Vec::new();

    ctx.set_fill_style_str(BLANK);
    ctx.fill_rect(0.0, 0.0, w, h);

    if let Some(src) = tree.background.as_deref() {
        match images.ready(src) {
            Some(img) => draw_image(ctx, img, 0.0, 0.0, w, h),
            None => missing.push(src),
        }
    }

    for item in &tree.items {
        match &item.content {
            RenderContent::Image { source } => match images.ready(source) {
                Some(img) => draw_image(ctx, img, item.x, item.y, item.width, item.height),
                None => {
                    ctx.set_fill_style_str(PLACEHOLDER);
                    ctx.fill_rect(item.x, item.y, item.width, item.height);
                    missing.push(source.as_str());
                }
            },
            RenderContent::Text { .. } => draw_text(ctx, item),
        }
    }

    if show_selection
        && let Some(item) = tree.selected.and_then(|id| tree.items.iter().find(|i| i.id == id))
    {
        draw_selection(ctx, item);
    }
    missing
}

fn draw_text(ctx: &CanvasRenderingContext2d, item: &RenderItem) {
    let RenderContent::Text {
        lines,
        font,
        color,
        line_height,
        padding,
        ..
    } = &item.content
    else {
        return;
    };
    ctx.save();
    ctx.set_font(font);
    ctx.set_fill_style_str(color);
    ctx.set_text_baseline("top");
    for (i, line) in lines.iter().enumerate() {
        let y = item.y + padding + i as f64 * line_height;
        if ctx.fill_text(line, item.x + padding, y).is_err() {
            log::warn!("fillText failed for line {i} of {}", item.id);
        }
    }
    ctx.restore();
}

fn draw_image(ctx: &CanvasRenderingContext2d, img: &HtmlImageElement, x: f64, y: f64, w: f64, h: f64) {
    let natural = (f64::from(img.natural_width()), f64::from(img.natural_height()));
    let (dx, dy, dw, dh) = contain(natural, x, y, w, h);
    if ctx
        .draw_image_with_html_image_element_and_dw_and_dh(img, dx, dy, dw, dh)
        .is_err()
    {
        log::warn!("drawImage failed for `{}`", img.src());
    }
}

fn draw_selection(ctx: &CanvasRenderingContext2d, item: &RenderItem) {
    ctx.save();
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(2.0);
    ctx.stroke_rect(item.x - 1.0, item.y - 1.0, item.width + 2.0, item.height + 2.0);

    let handle = 8.0;
    let half = handle / 2.0;
    ctx.set_fill_style_str(BLANK);
    ctx.set_line_width(1.5);
    let (x, y, w, h) = (item.x, item.y, item.width, item.height);
    for (hx, hy) in [(x, y), (x + w, y), (x, y + h), (x + w, y + h)] {
        ctx.fill_rect(hx - half, hy - half, handle, handle);
        ctx.stroke_rect(hx - half, hy - half, handle, handle);
    }
    ctx.restore();
}

/// Fit an image of `natural` size inside a box, keeping its aspect ratio
/// and centering it.
pub(crate) fn contain(natural: (f64, f64), x: f64, y: f64, w: f64, h: f64) -> (f64, f64, f64, f64) {
    let (nw, nh) = natural;
    if nw <= 0.0 || nh <= 0.0 {
        return (x, y, w, h);
    }
    let scale = (w / nw).min(h / nh);
    let (dw, dh) = (nw * scale, nh * scale);
    (x + (w - dw) / 2.0, y + (h - dh) / 2.0, dw, dh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contain_letterboxes_wide_images() {
        assert_eq!(
            contain((200.0, 100.0), 0.0, 0.0, 150.0, 150.0),
            (0.0, 37.5, 150.0, 75.0)
        );
    }

    #[test]
    fn contain_pillarboxes_tall_images() {
        assert_eq!(
            contain((100.0, 400.0), 10.0, 10.0, 100.0, 100.0),
            (47.5, 10.0, 25.0, 100.0)
        );
    }

    #[test]
    fn contain_passes_through_unknown_size() {
        assert_eq!(contain((0.0, 0.0), 1.0, 2.0, 3.0, 4.0), (1.0, 2.0, 3.0, 4.0));
    }
}
