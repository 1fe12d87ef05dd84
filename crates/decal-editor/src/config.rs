//! Editor session configuration.
//!
//! Every field has a default, so hosts only pass what they override.
//! Deserialized from camelCase JSON.

use decal_core::{Placement, Point, ProductId, Viewport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Number of most recent states kept for undo. Default: **50**.
    pub history_capacity: usize,
    /// Hold duration that turns a touch on text into in-place editing.
    pub long_press_ms: f64,
    pub default_font_size: f64,
    /// Content of a freshly added text element.
    pub default_text: String,
    pub text_padding: f64,
    /// Top-left offset of freshly added images, on both axes.
    pub image_offset: f64,
    /// Edge length of freshly added images.
    pub image_size: f64,
    /// Product shown when the session starts. `None` shows the catalog
    /// background until the user picks one.
    pub initial_product: Option<ProductId>,
    /// Pixel ratio used when flattening for export.
    pub export_scale: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1080.0,
            canvas_height: 1920.0,
            history_capacity: crate::history::DEFAULT_CAPACITY,
            long_press_ms: 500.0,
            default_font_size: 32.0,
            default_text: "Your text".to_string(),
            text_padding: 8.0,
            image_offset: 100.0,
            image_size: 150.0,
            initial_product: None,
            export_scale: 2.0,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) config. An empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas_width, self.canvas_height)
    }

    pub fn placement(&self) -> Placement {
        Placement {
            text_padding: self.text_padding,
            image_offset: Point::new(self.image_offset, self.image_offset),
        }
    }
}
