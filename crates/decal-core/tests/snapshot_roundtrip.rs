//! Integration tests: scene snapshots (decal-core).
//!
//! Serializing and restoring must preserve ids, geometry, and content,
//! and a stored snapshot must never alias the live scene.

use decal_core::*;
use pretty_assertions::assert_eq;

const CATALOG: &str = r##"{
    "background": "welcome.png",
    "products": [
        { "id": "tee", "name": "T-Shirt", "image": "tee.png" },
        { "id": "mug", "name": "Mug", "image": "mug.png" }
    ],
    "colors": ["#000000", "#FFFFFF", "#FF0000"],
    "fonts": ["Roboto", "Montserrat", "Bebas Neue"]
}"##;

fn populated_scene(catalog: &Catalog) -> (SceneGraph, ElementId, ElementId) {
    let mut scene = SceneGraph::new(Viewport::new(1080.0, 1920.0));
    scene.set_background(Background::resolve(catalog, Some(&ProductId::new("mug"))));
    let text = scene.add_element(
        NewElement::Text {
            content: "Hello".into(),
            font: FontSpec::new("Roboto", 32.0),
            color: Color::BLACK,
        },
        &EstimatedMetrics,
    );
    let image = scene.add_element(
        NewElement::Image {
            source: "star.png".into(),
            size: Size::new(150.0, 150.0),
        },
        &EstimatedMetrics,
    );
    scene.move_element(image, Point::new(300.0, 420.0));
    (scene, text, image)
}

#[test]
fn restore_of_serialize_is_identity() {
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let (scene, _, _) = populated_scene(&catalog);
    let entry = scene.serialize_snapshot();

    let mut restored = SceneGraph::new(scene.canvas);
    restored.restore_snapshot(&entry, &catalog);

    assert_eq!(restored.elements(), scene.elements());
    assert_eq!(restored.background, scene.background);
}

#[test]
fn snapshot_does_not_alias_live_scene() {
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let (mut scene, text, image) = populated_scene(&catalog);
    let entry = scene.serialize_snapshot();

    scene.set_text(text, "Changed", &EstimatedMetrics);
    scene.move_element(image, Point::new(0.0, 0.0));

    let stored_text = entry.elements()[0].as_text().unwrap();
    assert_eq!(stored_text.content, "Hello");
    assert_eq!(entry.elements()[1].position, Point::new(300.0, 420.0));
}

#[test]
fn mutating_restored_scene_leaves_entry_intact() {
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let (scene, text, _) = populated_scene(&catalog);
    let entry = scene.serialize_snapshot();

    let mut restored = SceneGraph::new(scene.canvas);
    restored.restore_snapshot(&entry, &catalog);
    restored.set_text(text, "Mutated", &EstimatedMetrics);

    assert_eq!(entry.elements()[0].as_text().unwrap().content, "Hello");
}

#[test]
fn restore_resolves_background_from_product() {
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let (scene, _, _) = populated_scene(&catalog);
    let entry = scene.serialize_snapshot();
    assert_eq!(entry.product(), Some(&ProductId::new("mug")));

    let mut other = SceneGraph::new(scene.canvas);
    other.restore_snapshot(&entry, &catalog);
    assert_eq!(other.background.uri.as_deref(), Some("mug.png"));

    let empty = SceneGraph::new(scene.canvas).serialize_snapshot();
    other.restore_snapshot(&empty, &catalog);
    assert_eq!(other.background.uri.as_deref(), Some("welcome.png"));
    assert!(other.is_empty());
}

#[test]
fn restore_keeps_selection_only_if_present() {
    let catalog = Catalog::from_json(CATALOG).unwrap();
    let (mut scene, text, image) = populated_scene(&catalog);
    let entry = scene.serialize_snapshot();

    scene.select(Some(text));
    scene.restore_snapshot(&entry, &catalog);
    assert_eq!(scene.selected(), Some(text));

    scene.remove_element(image);
    let without_image = scene.serialize_snapshot();
    scene.restore_snapshot(&entry, &catalog);
    scene.select(Some(image));
    scene.restore_snapshot(&without_image, &catalog);
    assert_eq!(scene.selected(), None);
}
