//! Read-only render tree handed to flattening adapters.
//!
//! A render tree is a self-contained, owned view of the scene at one
//! instant: resolved background, optional logo, and every overlay in paint
//! order with final geometry and CSS-ready style strings. Adapters walk it
//! bottom-to-top and never touch the live scene graph.

use decal_core::{Catalog, ElementId, ElementKind, SceneGraph, Viewport};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderTree {
    pub canvas: Viewport,
    pub background: Option<String>,
    /// Event logo for host page chrome. Painters and flatteners skip it;
    /// it is never part of the rendered design.
    pub logo: Option<String>,
    pub items: Vec<RenderItem>,
    /// For live rendering only; flatteners must not draw selection chrome.
    pub selected: Option<ElementId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderItem {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content: RenderContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderContent {
    #[serde(rename_all = "camelCase")]
    Text {
        lines: Vec<String>,
        /// CSS `font` shorthand.
        font: String,
        /// `#RRGGBB[AA]`.
        color: String,
        font_size: f64,
        line_height: f64,
        padding: f64,
    },
    Image { source: String },
}

impl RenderTree {
    pub fn from_scene(scene: &SceneGraph, catalog: &Catalog) -> Self {
        let padding = scene.placement.text_padding;
        let items = scene
            .elements()
            .iter()
            .map(|el| {
                let content = match &el.kind {
                    ElementKind::Text(text) => RenderContent::Text {
                        lines: text.content.split('\n').map(String::from).collect(),
                        font: text.font.css(),
                        color: text.color.to_hex(),
                        font_size: text.font.size,
                        line_height: text.font.size * 1.2,
                        padding,
                    },
                    ElementKind::Image(image) => RenderContent::Image {
                        source: image.source.clone(),
                    },
                };
                RenderItem {
                    id: el.id,
                    x: el.position.x,
                    y: el.position.y,
                    width: el.size.width,
                    height: el.size.height,
                    content,
                }
            })
            .collect();

        Self {
            canvas: scene.canvas,
            background: scene.background.uri.clone(),
            logo: catalog.logo.clone(),
            items,
            selected: scene.selected(),
        }
    }

    /// Every image URI the tree references (background first), deduplicated.
    /// Hosts preload these before flattening.
    pub fn image_sources(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let overlays = self.items.iter().filter_map(|item| match &item.content {
            RenderContent::Image { source } => Some(source.as_str()),
            RenderContent::Text { .. } => None,
        });
        for src in self.background.as_deref().into_iter().chain(overlays) {
            if !out.contains(&src) {
                out.push(src);
            }
        }
        out
    }
}
