//! Overlay scene graph for the personalization canvas.
//!
//! The scene is a flat, ordered list of overlay elements (text and images)
//! layered above a single background product photo. Insertion order is the
//! z-order: the last element paints on top. Positions are canvas-local
//! top-left offsets and are clamped on every mutation so each element's
//! bounding box stays inside the canvas.

use crate::catalog::{Catalog, ProductId};
use crate::id::ElementId;
use crate::layout::{Placement, TextMeasure, Viewport};
use crate::snapshot::HistoryEntry;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

// ─── Colors ──────────────────────────────────────────────────────────────

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let digits = hex
            .bytes()
            .map(hex_val)
            .collect::<Option<Vec<u8>>>()?;

        match digits.as_slice() {
            [r, g, b] => Some(Self::rgba(r * 17, g * 17, b * 17, 255)),
            [r, g, b, a] => Some(Self::rgba(r * 17, g * 17, b * 17, a * 17)),
            [r1, r2, g1, g2, b1, b2] => Some(Self::rgba(
                r1 << 4 | r2,
                g1 << 4 | g2,
                b1 << 4 | b2,
                255,
            )),
            [r1, r2, g1, g2, b1, b2, a1, a2] => Some(Self::rgba(
                r1 << 4 | r2,
                g1 << 4 | g2,
                b1 << 4 | b2,
                a1 << 4 | a2,
            )),
            _ => None,
        }
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

// ─── Font / Text ─────────────────────────────────────────────────────────

/// Overlay text is always rendered bold.
pub const TEXT_WEIGHT: u16 = 700;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub weight: u16,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            weight: TEXT_WEIGHT,
        }
    }

    /// CSS `font` shorthand, e.g. `700 32px "Bebas Neue"`.
    pub fn css(&self) -> String {
        let family = if self.family.contains(char::is_whitespace) {
            format!("\"{}\"", self.family)
        } else {
            self.family.clone()
        };
        format!("{} {}px {family}", self.weight, self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub content: String,
    pub font: FontSpec,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    /// Opaque asset reference (URL or data URI). Never changes after creation.
    pub source: String,
}

// ─── Elements ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    Text(TextElement),
    Image(ImageElement),
}

/// One user-placed object on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayElement {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Top-left corner, canvas-local.
    pub position: Point,
    /// Text: measured content plus padding. Image: explicit.
    pub size: Size,
}

impl OverlayElement {
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text(_))
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match &self.kind {
            ElementKind::Text(text) => Some(text),
            ElementKind::Image(_) => None,
        }
    }
}

/// Initial attributes for [`SceneGraph::add_element`].
#[derive(Debug, Clone)]
pub enum NewElement {
    Text {
        content: String,
        font: FontSpec,
        color: Color,
    },
    Image {
        source: String,
        size: Size,
    },
}

/// The product photo drawn beneath every overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Background {
    /// Image to draw; `None` leaves the canvas blank.
    pub uri: Option<String>,
    /// The catalog product this background came from, if any.
    pub product: Option<ProductId>,
}

impl Background {
    /// The catalog's default background, with no product selected.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            uri: catalog.background.clone(),
            product: None,
        }
    }

    /// Resolve a stored product id against the catalog. Unknown ids fall
    /// back to the catalog default.
    pub fn resolve(catalog: &Catalog, product: Option<&ProductId>) -> Self {
        match product.and_then(|id| catalog.product(id)) {
            Some(p) => Self {
                uri: Some(p.image.clone()),
                product: Some(p.id.clone()),
            },
            None => Self::from_catalog(catalog),
        }
    }
}

// ─── Scene Graph ─────────────────────────────────────────────────────────

/// The live, mutable editing scene.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    elements: Vec<OverlayElement>,
    pub background: Background,
    selected: Option<ElementId>,
    pub canvas: Viewport,
    pub placement: Placement,
}

impl SceneGraph {
    #[must_use]
    pub fn new(canvas: Viewport) -> Self {
        Self::with_placement(canvas, Placement::default())
    }

    #[must_use]
    pub fn with_placement(canvas: Viewport, placement: Placement) -> Self {
        Self {
            elements: Vec::new(),
            background: Background::default(),
            selected: None,
            canvas,
            placement,
        }
    }

    /// Elements in paint order (bottom first).
    pub fn elements(&self) -> &[OverlayElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: ElementId) -> Option<&OverlayElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut OverlayElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&OverlayElement> {
        self.selected.and_then(|id| self.element(id))
    }

    /// Insert a new element on top of the stack and select it.
    ///
    /// Text is centered on the canvas; images go to the placement offset.
    /// History is not committed here.
    pub fn add_element(&mut self, attrs: NewElement, metrics: &dyn TextMeasure) -> ElementId {
        let (id, kind, size, anchor) = match attrs {
            NewElement::Text {
                content,
                font,
                color,
            } => {
                let size = self.text_box(&content, &font, metrics);
                let anchor = self.canvas.centered(size);
                let text = TextElement {
                    content,
                    font,
                    color,
                };
                (ElementId::with_prefix("text"), ElementKind::Text(text), size, anchor)
            }
            NewElement::Image { source, size } => (
                ElementId::with_prefix("image"),
                ElementKind::Image(ImageElement { source }),
                size,
                self.placement.image_offset,
            ),
        };

        let position = self.canvas.clamp(anchor, size);
        self.elements.push(OverlayElement {
            id,
            kind,
            position,
            size,
        });
        self.selected = Some(id);
        log::debug!("added {id} at ({:.1}, {:.1})", position.x, position.y);
        id
    }

    /// Remove an element. Unknown ids are ignored.
    pub fn remove_element(&mut self, id: ElementId) -> Option<OverlayElement> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.elements.remove(index))
    }

    /// Move an element, clamped to the canvas. Returns the applied position,
    /// or `None` if the id is unknown.
    pub fn move_element(&mut self, id: ElementId, position: Point) -> Option<Point> {
        let canvas = self.canvas;
        let element = self.element_mut(id)?;
        element.position = canvas.clamp(position, element.size);
        Some(element.position)
    }

    /// Resize an image element, re-clamping its position.
    pub fn resize_element(&mut self, id: ElementId, size: Size) -> Option<Size> {
        if !(size.width > 0.0 && size.height > 0.0) {
            return None;
        }
        let canvas = self.canvas;
        let element = self.element_mut(id)?;
        if element.is_text() {
            return None;
        }
        element.size = size;
        element.position = canvas.clamp(element.position, size);
        Some(size)
    }

    /// Replace the content of a text element and re-measure it.
    /// Returns `false` for unknown ids and image elements.
    pub fn set_text(&mut self, id: ElementId, content: &str, metrics: &dyn TextMeasure) -> bool {
        self.restyle_text(id, metrics, |text| text.content = content.to_string())
    }

    /// Mutate a text element's attributes in place, then re-measure and
    /// re-clamp it.
    pub fn restyle_text(
        &mut self,
        id: ElementId,
        metrics: &dyn TextMeasure,
        edit: impl FnOnce(&mut TextElement),
    ) -> bool {
        let canvas = self.canvas;
        let padding = self.placement.text_padding;
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        let ElementKind::Text(text) = &mut element.kind else {
            return false;
        };
        edit(text);
        let measured = metrics.measure(&text.content, &text.font);
        element.size = pad(measured, padding);
        element.position = canvas.clamp(element.position, element.size);
        true
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    /// Set (or clear) the single selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.selected = id.filter(|id| self.element(*id).is_some());
    }

    /// Drop every overlay and the selection. The background is kept.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.selected = None;
    }

    // ─── Snapshots ───────────────────────────────────────────────────────

    /// Deep copy of the element list plus the active product.
    pub fn serialize_snapshot(&self) -> HistoryEntry {
        HistoryEntry::new(self.elements.clone(), self.background.product.clone())
    }

    /// Replace every overlay with copies from `entry`, keeping their ids.
    ///
    /// The background is re-resolved from the stored product id. Selection
    /// survives only if the selected element exists in the snapshot.
    pub fn restore_snapshot(&mut self, entry: &HistoryEntry, catalog: &Catalog) {
        self.elements = entry.elements().to_vec();
        self.background = Background::resolve(catalog, entry.product());
        if let Some(id) = self.selected
            && self.element(id).is_none()
        {
            self.selected = None;
        }
    }

    fn text_box(&self, content: &str, font: &FontSpec, metrics: &dyn TextMeasure) -> Size {
        pad(metrics.measure(content, font), self.placement.text_padding)
    }
}

fn pad(size: Size, padding: f64) -> Size {
    Size::new(size.width + padding * 2.0, size.height + padding * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::EstimatedMetrics;
    use pretty_assertions::assert_eq;

    fn text(content: &str) -> NewElement {
        NewElement::Text {
            content: content.into(),
            font: FontSpec::new("Roboto", 32.0),
            color: Color::BLACK,
        }
    }

    fn image() -> NewElement {
        NewElement::Image {
            source: "data:image/png;base64,AAAA".into(),
            size: Size::new(150.0, 150.0),
        }
    }

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#6C5CE7").unwrap();
        assert_eq!(c.to_hex(), "#6C5CE7");
        assert_eq!(Color::from_hex("fff").unwrap(), Color::rgba(255, 255, 255, 255));
        assert_eq!(Color::from_hex("#00000080").unwrap().to_hex(), "#00000080");
        assert!(Color::from_hex("#zzz").is_none());
    }

    #[test]
    fn font_css_quotes_multiword_families() {
        assert_eq!(FontSpec::new("Roboto", 32.0).css(), "700 32px Roboto");
        assert_eq!(
            FontSpec::new("Bebas Neue", 28.5).css(),
            "700 28.5px \"Bebas Neue\""
        );
    }

    #[test]
    fn text_is_centered_and_selected() {
        let mut scene = SceneGraph::new(Viewport::new(1080.0, 1920.0));
        let id = scene.add_element(text("Hi"), &EstimatedMetrics);
        let el = scene.element(id).unwrap();
        let center = el.bounds().center();
        assert!((center.x - 540.0).abs() < 1e-6);
        assert!((center.y - 960.0).abs() < 1e-6);
        assert_eq!(scene.selected(), Some(id));
    }

    #[test]
    fn image_lands_at_offset() {
        let mut scene = SceneGraph::new(Viewport::default());
        let id = scene.add_element(image(), &EstimatedMetrics);
        assert_eq!(scene.element(id).unwrap().position, Point::new(100.0, 100.0));
    }

    #[test]
    fn image_offset_is_clamped_on_small_canvas() {
        let mut scene = SceneGraph::new(Viewport::new(200.0, 200.0));
        let id = scene.add_element(image(), &EstimatedMetrics);
        assert_eq!(scene.element(id).unwrap().position, Point::new(50.0, 50.0));
    }

    #[test]
    fn new_elements_stack_on_top() {
        let mut scene = SceneGraph::new(Viewport::default());
        let a = scene.add_element(image(), &EstimatedMetrics);
        let b = scene.add_element(text("top"), &EstimatedMetrics);
        let ids: Vec<_> = scene.elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn remove_clears_selection_and_ignores_unknown() {
        let mut scene = SceneGraph::new(Viewport::default());
        let id = scene.add_element(image(), &EstimatedMetrics);
        assert!(scene.remove_element(ElementId::intern("missing")).is_none());
        assert_eq!(scene.len(), 1);
        assert!(scene.remove_element(id).is_some());
        assert_eq!(scene.selected(), None);
        assert!(scene.is_empty());
    }

    #[test]
    fn move_clamps_and_ignores_unknown() {
        let mut scene = SceneGraph::new(Viewport::new(1080.0, 1920.0));
        let id = scene.add_element(image(), &EstimatedMetrics);
        let applied = scene.move_element(id, Point::new(-500.0, -500.0));
        assert_eq!(applied, Some(Point::ORIGIN));
        assert_eq!(scene.move_element(ElementId::intern("ghost"), Point::ORIGIN), None);
    }

    #[test]
    fn resize_rejects_text_and_non_positive() {
        let mut scene = SceneGraph::new(Viewport::default());
        let t = scene.add_element(text("x"), &EstimatedMetrics);
        let i = scene.add_element(image(), &EstimatedMetrics);
        assert_eq!(scene.resize_element(t, Size::new(10.0, 10.0)), None);
        assert_eq!(scene.resize_element(i, Size::new(0.0, 10.0)), None);
        assert_eq!(
            scene.resize_element(i, Size::new(300.0, 200.0)),
            Some(Size::new(300.0, 200.0))
        );
    }

    #[test]
    fn set_text_remeasures() {
        let mut scene = SceneGraph::new(Viewport::default());
        let id = scene.add_element(text("a"), &EstimatedMetrics);
        let before = scene.element(id).unwrap().size.width;
        assert!(scene.set_text(id, "a much longer line", &EstimatedMetrics));
        assert!(scene.element(id).unwrap().size.width > before);
    }

    #[test]
    fn select_unknown_clears() {
        let mut scene = SceneGraph::new(Viewport::default());
        let id = scene.add_element(image(), &EstimatedMetrics);
        scene.select(Some(ElementId::intern("nope")));
        assert_eq!(scene.selected(), None);
        scene.select(Some(id));
        assert_eq!(scene.selected(), Some(id));
    }
}
