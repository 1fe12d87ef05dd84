//! WASM bridge for Decal: exposes the editor session to the browser.
//!
//! Compiled via `wasm-pack build --target web`. Every action returns a small
//! JSON status string: `{"ok":true,"changed":..,"canUndo":..,"canRedo":..,
//! "selected":..,"editing":..}` or `{"ok":false,"error":"..."}` plus the
//! same history flags.

mod flatten;
mod render2d;

use decal_core::{Catalog, EditorError, ElementKind, EstimatedMetrics, TextMeasure};
use decal_editor::{Editor, EditorConfig, ExportReceipt, ImageLoad, InputEvent, PointerKind};
use flatten::{Canvas2dFlattener, CanvasMetrics};
use render2d::ImageCache;
use serde_json::json;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The JS-facing editor handle.
#[wasm_bindgen]
pub struct DecalEditor {
    editor: Editor,
    images: ImageCache,
    last_receipt: Option<ExportReceipt>,
}

#[wasm_bindgen]
impl DecalEditor {
    /// Start a session. `config_json` may be empty. A non-positive size
    /// keeps the configured canvas size.
    ///
    /// Throws when the catalog is unusable; the host should send the admin
    /// back to configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(
        catalog_json: &str,
        config_json: &str,
        width: f64,
        height: f64,
    ) -> Result<DecalEditor, JsError> {
        console_error_panic_hook_setup();

        let catalog = Catalog::from_json(catalog_json)?;
        let mut config = EditorConfig::from_json(config_json)?;
        if width > 0.0 && height > 0.0 {
            config.canvas_width = width;
            config.canvas_height = height;
        }
        let metrics: Box<dyn TextMeasure> = match CanvasMetrics::offscreen() {
            Some(m) => Box::new(m),
            None => Box::new(EstimatedMetrics),
        };
        Ok(Self {
            editor: Editor::with_metrics(catalog, config, metrics)?,
            images: ImageCache::default(),
            last_receipt: None,
        })
    }

    /// Paint the live surface, including the selection outline.
    pub fn render(&mut self, ctx: &CanvasRenderingContext2d) {
        let tree = self.editor.render_tree();
        self.images.request_all(&tree);
        render2d::paint_tree(ctx, &tree, &self.images, true);
    }

    pub fn resize(&mut self, width: f64, height: f64) -> String {
        let result = self.editor.set_canvas_size(width, height).map(|()| true);
        self.respond(result)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// `pointer_type` is the DOM `PointerEvent.pointerType`.
    pub fn pointer_down(&mut self, x: f64, y: f64, time_ms: f64, pointer_type: &str) -> String {
        self.input(InputEvent::PointerDown {
            x,
            y,
            time_ms,
            kind: PointerKind::from_dom(pointer_type),
        })
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, time_ms: f64) -> String {
        self.input(InputEvent::PointerMove { x, y, time_ms })
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, time_ms: f64) -> String {
        self.input(InputEvent::PointerUp { x, y, time_ms })
    }

    pub fn pointer_cancel(&mut self, time_ms: f64) -> String {
        self.input(InputEvent::PointerCancel { time_ms })
    }

    pub fn double_click(&mut self, x: f64, y: f64, time_ms: f64) -> String {
        self.input(InputEvent::DoubleClick { x, y, time_ms })
    }

    /// Call from `requestAnimationFrame` while a pointer is down.
    pub fn tick(&mut self, time_ms: f64) -> String {
        self.input(InputEvent::Tick { time_ms })
    }

    pub fn text_input(&mut self, content: &str) -> String {
        self.input(InputEvent::TextInput {
            content: content.to_string(),
        })
    }

    pub fn key(&mut self, key: &str, shift: bool) -> String {
        self.input(InputEvent::Key {
            key: key.to_string(),
            shift,
        })
    }

    pub fn blur(&mut self) -> String {
        self.input(InputEvent::Blur)
    }

    // ─── Actions ─────────────────────────────────────────────────────────

    pub fn add_text(&mut self) -> String {
        let result = self.editor.add_text().map(|_| true);
        self.respond(result)
    }

    /// Report a decoded image the host loaded from `source`.
    pub fn add_image(&mut self, source: &str, width: f64, height: f64) -> String {
        let result = self
            .editor
            .add_image(source, ImageLoad::Decoded { width, height })
            .map(|_| true);
        if result.is_ok() {
            self.images.request(source);
        }
        self.respond(result)
    }

    /// Report an image the host failed to load.
    pub fn image_failed(&mut self, source: &str, reason: &str) -> String {
        let result = self
            .editor
            .add_image(source, ImageLoad::Failed(reason.to_string()))
            .map(|_| true);
        self.respond(result)
    }

    pub fn delete_selected(&mut self) -> String {
        let result = self.editor.delete_selected().map(|_| true);
        self.respond(result)
    }

    pub fn select_by_id(&mut self, id: &str) -> String {
        let target = (!id.is_empty()).then(|| decal_core::ElementId::intern(id));
        let result = self.editor.select(target).map(|()| true);
        self.respond(result)
    }

    pub fn resize_selected(&mut self, width: f64, height: f64) -> String {
        let result = self.editor.resize_selected(width, height).map(|()| true);
        self.respond(result)
    }

    pub fn undo(&mut self) -> String {
        let result = self.editor.undo();
        self.respond(result)
    }

    pub fn redo(&mut self) -> String {
        let result = self.editor.redo();
        self.respond(result)
    }

    pub fn reset(&mut self) -> String {
        let result = self.editor.reset().map(|()| true);
        self.respond(result)
    }

    pub fn select_product(&mut self, id: &str) -> String {
        let result = self.editor.select_product(id).map(|()| true);
        self.respond(result)
    }

    pub fn set_font(&mut self, family: &str) -> String {
        let result = self.editor.set_font(family);
        self.respond(result)
    }

    pub fn set_color(&mut self, color: &str) -> String {
        let result = self.editor.set_color(color);
        self.respond(result)
    }

    pub fn set_font_size(&mut self, size: &str) -> String {
        let result = self.editor.set_font_size(size);
        self.respond(result)
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Properties of the selected element as JSON, or `{}`.
    pub fn selected_props(&self) -> String {
        let Some(el) = self.editor.scene().selected_element() else {
            return "{}".to_string();
        };
        let mut props = json!({
            "id": el.id.as_str(),
            "x": el.position.x,
            "y": el.position.y,
            "width": el.size.width,
            "height": el.size.height,
        });
        match &el.kind {
            ElementKind::Text(text) => {
                props["kind"] = "text".into();
                props["content"] = text.content.clone().into();
                props["fontFamily"] = text.font.family.clone().into();
                props["fontSize"] = json!(text.font.size);
                props["color"] = text.color.to_hex().into();
            }
            ElementKind::Image(image) => {
                props["kind"] = "image".into();
                props["source"] = image.source.clone().into();
            }
        }
        props.to_string()
    }

    pub fn render_tree_json(&self) -> String {
        serde_json::to_string(&self.editor.render_tree()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Fonts and palette the UI should offer.
    pub fn style_options_json(&self) -> String {
        let catalog = self.editor.catalog();
        json!({
            "fonts": catalog.fonts,
            "colors": catalog.colors,
            "freeFormColors": catalog.is_free_form_color(),
        })
        .to_string()
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Flatten on an offscreen canvas and package the design.
    ///
    /// Success adds `image` (PNG data URL) and `record` (design JSON) to the
    /// status. The MessagePack form is available from
    /// [`DecalEditor::last_record_msgpack`].
    pub fn save(&mut self, client_name: &str) -> String {
        let scale = self.editor.config().export_scale;
        let now = js_sys::Date::now() as u64;
        let mut flattener = Canvas2dFlattener::new(&self.images, scale);
        let result = self.editor.save(client_name, &mut flattener, now);
        self.receipt_status(result)
    }

    /// Lock the editor and return the render tree for a host-side
    /// flattener. Pair with [`DecalEditor::finish_export`].
    pub fn begin_export(&mut self, client_name: &str) -> String {
        match self.editor.begin_export(client_name) {
            Ok(tree) => {
                let mut status = self.status_value(false);
                status["tree"] = serde_json::to_value(&tree).unwrap_or_default();
                status.to_string()
            }
            Err(err) => self.failure(&err),
        }
    }

    /// Pass `image` on success or `error` on failure.
    pub fn finish_export(
        &mut self,
        image: Option<String>,
        error: Option<String>,
        timestamp_ms: f64,
    ) -> String {
        let outcome = match (image, error) {
            (Some(image), None) => Ok(image),
            (_, Some(error)) => Err(error),
            (None, None) => Err("no image produced".to_string()),
        };
        let result = self.editor.finish_export(outcome, timestamp_ms as u64);
        self.receipt_status(result)
    }

    pub fn last_record_msgpack(&self) -> Option<Vec<u8>> {
        let receipt = self.last_receipt.as_ref()?;
        receipt
            .record
            .to_msgpack()
            .inspect_err(|e| log::warn!("record encoding failed: {e}"))
            .ok()
    }

    pub fn is_exporting(&self) -> bool {
        self.editor.is_exporting()
    }
}

impl DecalEditor {
    fn input(&mut self, event: InputEvent) -> String {
        let result = self.editor.handle(&event);
        self.respond(result)
    }

    fn status_value(&self, changed: bool) -> serde_json::Value {
        json!({
            "ok": true,
            "changed": changed,
            "canUndo": self.editor.can_undo(),
            "canRedo": self.editor.can_redo(),
            "selected": self.editor.selected().map(|id| id.to_string()),
            "editing": self.editor.editing().map(|id| id.to_string()),
            "product": self.editor.current_product().map(|p| p.to_string()),
        })
    }

    fn failure(&self, err: &EditorError) -> String {
        json!({
            "ok": false,
            "error": err.to_string(),
            "canUndo": self.editor.can_undo(),
            "canRedo": self.editor.can_redo(),
        })
        .to_string()
    }

    fn respond(&self, result: Result<bool, EditorError>) -> String {
        match result {
            Ok(changed) => self.status_value(changed).to_string(),
            Err(err) => self.failure(&err),
        }
    }

    fn receipt_status(&mut self, result: Result<ExportReceipt, EditorError>) -> String {
        match result {
            Ok(receipt) => {
                let mut status = self.status_value(false);
                status["image"] = receipt.token().into();
                status["record"] = serde_json::to_value(&receipt.record).unwrap_or_default();
                self.last_receipt = Some(receipt);
                status.to_string()
            }
            Err(err) => self.failure(&err),
        }
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Decal WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
