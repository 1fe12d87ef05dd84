//! Offscreen Canvas2D flattening and canvas-backed text metrics.

use crate::render2d::{self, ImageCache};
use decal_core::{EstimatedMetrics, FontSpec, Size, TextMeasure};
use decal_editor::Flattener;
use decal_render::RenderTree;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

fn js_err(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn offscreen_canvas(width: u32, height: u32) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| "not a canvas element".to_string())?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(js_err)?
        .ok_or("2d context unavailable")?
        .dyn_into()
        .map_err(|_| "not a 2d context".to_string())?;
    Ok((canvas, ctx))
}

/// Rasterizes a render tree to a PNG data URL at `scale` device pixels per
/// logical pixel. Every referenced image must already be decoded.
pub struct Canvas2dFlattener<'a> {
    images: &'a ImageCache,
    scale: f64,
}

impl<'a> Canvas2dFlattener<'a> {
    pub fn new(images: &'a ImageCache, scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self { images, scale }
    }
}

impl Flattener for Canvas2dFlattener<'_> {
    fn flatten(&mut self, tree: &RenderTree, client_name: &str) -> Result<String, String> {
        let pending: Vec<&str> = tree
            .image_sources()
            .into_iter()
            .filter(|src| self.images.ready(src).is_none())
            .collect();
        if !pending.is_empty() {
            return Err(format!("images still loading: {}", pending.join(", ")));
        }

        let width = (tree.canvas.width * self.scale).round() as u32;
        let height = (tree.canvas.height * self.scale).round() as u32;
        let (canvas, ctx) = offscreen_canvas(width, height)?;
        ctx.scale(self.scale, self.scale).map_err(js_err)?;
        render2d::paint_tree(&ctx, tree, self.images, false);

        let url = canvas.to_data_url_with_type("image/png").map_err(js_err)?;
        log::info!("flattened design for `{client_name}` at {width}x{height}");
        Ok(url)
    }
}

/// `measureText`-backed metrics on a private 1×1 canvas.
pub struct CanvasMetrics {
    ctx: CanvasRenderingContext2d,
}

impl CanvasMetrics {
    /// `None` outside a browser.
    pub fn offscreen() -> Option<Self> {
        if !cfg!(target_arch = "wasm32") {
            return None;
        }
        offscreen_canvas(1, 1).ok().map(|(_, ctx)| Self { ctx })
    }
}

impl TextMeasure for CanvasMetrics {
    fn measure(&self, content: &str, font: &FontSpec) -> Size {
        self.ctx.set_font(&font.css());
        let width = content
            .split('\n')
            .map(|line| match self.ctx.measure_text(line) {
                Ok(m) => m.width(),
                Err(_) => EstimatedMetrics.measure(line, font).width,
            })
            .fold(0.0, f64::max);
        let lines = content.split('\n').count().max(1);
        Size::new(width, lines as f64 * font.size * 1.2)
    }
}
