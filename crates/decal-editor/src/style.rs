//! Font, color and size changes on the selected text element.
//!
//! Every operation checks the selection first, then validates the value
//! against the catalog, and leaves the scene untouched on refusal. An accepted change that equals the current
//! value is a no-op and does not add a history entry.

use crate::history::HistoryManager;
use decal_core::value::{parse_color, parse_font_size};
use decal_core::{Catalog, EditorError, ElementId, SceneGraph, TextElement, TextMeasure};

pub struct StyleApplicator<'a> {
    pub scene: &'a mut SceneGraph,
    pub history: &'a mut HistoryManager,
    pub catalog: &'a Catalog,
    pub metrics: &'a dyn TextMeasure,
}

impl StyleApplicator<'_> {
    /// Returns whether the element changed.
    pub fn set_font(&mut self, family: &str) -> Result<bool, EditorError> {
        let (id, text) = self.selected_text()?;
        let family = family.trim();
        if !self.catalog.allows_font(family) {
            return Err(EditorError::FontNotAllowed(family.to_string()));
        }
        if text.font.family == family {
            return Ok(false);
        }
        Ok(self.apply(id, "font", |text| text.font.family = family.to_string()))
    }

    /// Accepts any CSS color form [`parse_color`] understands. With a
    /// palette configured, the color must match a palette entry by value.
    pub fn set_color(&mut self, input: &str) -> Result<bool, EditorError> {
        let (id, text) = self.selected_text()?;
        let color = parse_color(input).ok_or_else(|| EditorError::InvalidColor(input.to_string()))?;
        if !self.catalog.allows_color(color) {
            return Err(EditorError::ColorNotAllowed(input.trim().to_string()));
        }
        if text.color == color {
            return Ok(false);
        }
        Ok(self.apply(id, "color", |text| text.color = color))
    }

    pub fn set_font_size(&mut self, input: &str) -> Result<bool, EditorError> {
        let (id, text) = self.selected_text()?;
        let size = parse_font_size(input)
            .filter(|s| *s > 0.0)
            .ok_or_else(|| EditorError::InvalidFontSize(input.to_string()))?;
        if text.font.size == size {
            return Ok(false);
        }
        Ok(self.apply(id, "font size", |text| text.font.size = size))
    }

    fn selected_text(&self) -> Result<(ElementId, &TextElement), EditorError> {
        let element = self
            .scene
            .selected_element()
            .ok_or(EditorError::NoSelection)?;
        let text = element.as_text().ok_or(EditorError::NotText(element.id))?;
        Ok((element.id, text))
    }

    fn apply(&mut self, id: ElementId, label: &str, edit: impl FnOnce(&mut TextElement)) -> bool {
        let changed = self.scene.restyle_text(id, self.metrics, edit);
        if changed {
            self.history.commit(self.scene.serialize_snapshot());
            log::debug!("{label} changed on {id}");
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decal_core::{Color, EstimatedMetrics, FontSpec, NewElement, Size, Viewport};
    use pretty_assertions::assert_eq;

    fn catalog(colors: &str) -> Catalog {
        Catalog::from_json(&format!(
            r#"{{ "products": [{{ "id": "p", "image": "p.png" }}], "colors": {colors} }}"#
        ))
        .unwrap()
    }

    fn scene_with_text() -> (SceneGraph, ElementId) {
        let mut scene = SceneGraph::new(Viewport::new(1000.0, 1000.0));
        let id = scene.add_element(
            NewElement::Text {
                content: "hey".into(),
                font: FontSpec::new("Roboto", 32.0),
                color: Color::BLACK,
            },
            &EstimatedMetrics,
        );
        (scene, id)
    }

    #[test]
    fn font_size_remeasures_and_commits() {
        let catalog = catalog("[]");
        let (mut scene, id) = scene_with_text();
        let before = scene.element(id).unwrap().size;
        let mut history = HistoryManager::default();
        let mut style = StyleApplicator {
            scene: &mut scene,
            history: &mut history,
            catalog: &catalog,
            metrics: &EstimatedMetrics,
        };
        assert_eq!(style.set_font_size("64px"), Ok(true));
        assert_eq!(style.set_font_size("64"), Ok(false));
        assert_eq!(
            style.set_font_size("0"),
            Err(EditorError::InvalidFontSize("0".into()))
        );
        assert!(scene.element(id).unwrap().size.width > before.width);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn palette_is_enforced_by_value() {
        let catalog = catalog(r##"["#000000", "#FF0000", "#FFFFFF"]"##);
        let (mut scene, id) = scene_with_text();
        let mut history = HistoryManager::default();
        let mut style = StyleApplicator {
            scene: &mut scene,
            history: &mut history,
            catalog: &catalog,
            metrics: &EstimatedMetrics,
        };
        assert_eq!(style.set_color("rgb(255,0,0)"), Ok(true));
        assert_eq!(
            style.set_color("#00FF00"),
            Err(EditorError::ColorNotAllowed("#00FF00".into()))
        );
        assert_eq!(
            style.set_color("nope"),
            Err(EditorError::InvalidColor("nope".into()))
        );
        let text = scene.element(id).unwrap().as_text().unwrap();
        assert_eq!(text.color, Color::rgba(255, 0, 0, 255));
    }

    #[test]
    fn image_and_empty_selection_are_refused() {
        let catalog = catalog("[]");
        let (mut scene, _) = scene_with_text();
        let image = scene.add_element(
            NewElement::Image {
                source: "a.png".into(),
                size: Size::new(10.0, 10.0),
            },
            &EstimatedMetrics,
        );
        let mut history = HistoryManager::default();
        let mut style = StyleApplicator {
            scene: &mut scene,
            history: &mut history,
            catalog: &catalog,
            metrics: &EstimatedMetrics,
        };
        assert_eq!(style.set_color("#000"), Err(EditorError::NotText(image)));
        assert_eq!(
            style.set_font("Comic Sans"),
            Err(EditorError::FontNotAllowed("Comic Sans".into()))
        );
        style.scene.select(None);
        assert_eq!(style.set_font("Montserrat"), Err(EditorError::NoSelection));
        assert!(history.is_empty());
    }
}
