//! Integration tests: pointer gestures routed through the editor session.

use decal_core::{Catalog, ElementId, Point};
use decal_editor::{Editor, EditorConfig, GestureState, InputEvent, PointerKind};
use pretty_assertions::assert_eq;

fn make_editor() -> Editor {
    let catalog = Catalog::from_json(include_str!("fixtures/catalog.json")).unwrap();
    Editor::new(catalog, EditorConfig::default()).unwrap()
}

fn down(at: Point, time_ms: f64, kind: PointerKind) -> InputEvent {
    InputEvent::PointerDown {
        x: at.x,
        y: at.y,
        time_ms,
        kind,
    }
}

fn center(editor: &Editor, id: ElementId) -> Point {
    editor.scene().element(id).unwrap().bounds().center()
}

#[test]
fn drag_past_top_left_clamps_to_origin() {
    let mut editor = make_editor();
    let id = editor.add_text().unwrap();
    let c = center(&editor, id);
    let offset = c - editor.scene().element(id).unwrap().position;

    editor.handle(&down(c, 0.0, PointerKind::Mouse)).unwrap();
    let target = Point::new(-500.0, -500.0) + offset;
    editor
        .handle(&InputEvent::PointerMove {
            x: target.x,
            y: target.y,
            time_ms: 16.0,
        })
        .unwrap();
    editor
        .handle(&InputEvent::PointerUp {
            x: target.x,
            y: target.y,
            time_ms: 32.0,
        })
        .unwrap();

    assert_eq!(editor.scene().element(id).unwrap().position, Point::ZERO);
    assert_eq!(editor.gesture(), &GestureState::Idle);
}

#[test]
fn drag_past_bottom_right_stays_inside() {
    let mut editor = make_editor();
    let id = editor.add_text().unwrap();
    let c = center(&editor, id);
    editor.handle(&down(c, 0.0, PointerKind::Touch)).unwrap();
    editor
        .handle(&InputEvent::PointerMove {
            x: 5000.0,
            y: 9000.0,
            time_ms: 16.0,
        })
        .unwrap();
    editor
        .handle(&InputEvent::PointerCancel { time_ms: 20.0 })
        .unwrap();

    let el = editor.scene().element(id).unwrap();
    assert!((el.bounds().x1 - 1080.0).abs() < 1e-9);
    assert!((el.bounds().y1 - 1920.0).abs() < 1e-9);
    // Cancel still records the drag.
    assert!(editor.can_undo());
}

#[test]
fn tap_without_movement_adds_no_history() {
    let mut editor = make_editor();
    let id = editor.add_text().unwrap();
    let entries = editor.history().len();
    let c = center(&editor, id);
    editor.handle(&down(c, 0.0, PointerKind::Mouse)).unwrap();
    editor
        .handle(&InputEvent::PointerUp {
            x: c.x,
            y: c.y,
            time_ms: 80.0,
        })
        .unwrap();
    assert_eq!(editor.history().len(), entries);
}

#[test]
fn background_tap_clears_selection() {
    let mut editor = make_editor();
    editor.add_text().unwrap();
    assert!(editor.selected().is_some());
    let changed = editor
        .handle(&down(Point::new(2.0, 2.0), 0.0, PointerKind::Mouse))
        .unwrap();
    assert!(changed);
    assert_eq!(editor.selected(), None);
}

#[test]
fn long_press_then_type_commits_on_enter() {
    let mut editor = make_editor();
    let id = editor.add_text().unwrap();
    let entries = editor.history().len();
    let c = center(&editor, id);

    editor.handle(&down(c, 1_000.0, PointerKind::Touch)).unwrap();
    editor.handle(&InputEvent::Tick { time_ms: 1_600.0 }).unwrap();
    assert!(matches!(editor.gesture(), GestureState::EditingText { .. }));

    // Lifting the finger does not leave edit mode.
    editor
        .handle(&InputEvent::PointerUp {
            x: c.x,
            y: c.y,
            time_ms: 1_700.0,
        })
        .unwrap();
    editor
        .handle(&InputEvent::TextInput {
            content: "Line one\nLine two".into(),
        })
        .unwrap();
    editor
        .handle(&InputEvent::Key {
            key: "Enter".into(),
            shift: false,
        })
        .unwrap();

    let el = editor.scene().element(id).unwrap();
    assert_eq!(el.as_text().unwrap().content, "Line one\nLine two");
    assert_eq!(editor.history().len(), entries + 1);
    assert_eq!(editor.gesture(), &GestureState::Idle);
}

#[test]
fn action_during_edit_commits_edit_first() {
    let mut editor = make_editor();
    let id = editor.add_text().unwrap();
    let c = center(&editor, id);
    editor
        .handle(&InputEvent::DoubleClick {
            x: c.x,
            y: c.y,
            time_ms: 0.0,
        })
        .unwrap();
    editor
        .handle(&InputEvent::TextInput {
            content: "Draft".into(),
        })
        .unwrap();
    let entries = editor.history().len();

    editor.set_font_size("48").unwrap();
    assert_eq!(editor.history().len(), entries + 2);
    assert_eq!(editor.gesture(), &GestureState::Idle);

    editor.undo().unwrap();
    let text = editor.scene().element(id).unwrap().as_text().unwrap();
    assert_eq!(text.content, "Draft");
    assert_eq!(text.font.size, 32.0);
}

#[test]
fn delete_mid_drag_ends_the_gesture() {
    let mut editor = make_editor();
    let id = editor.add_text().unwrap();
    let c = center(&editor, id);
    editor.handle(&down(c, 0.0, PointerKind::Mouse)).unwrap();
    editor
        .handle(&InputEvent::PointerMove {
            x: c.x + 40.0,
            y: c.y + 30.0,
            time_ms: 16.0,
        })
        .unwrap();
    let moved = editor.scene().element(id).unwrap().position;

    assert_eq!(editor.delete_selected(), Ok(id));
    assert_eq!(editor.gesture(), &GestureState::Idle);
    let after_delete = editor.history().len();

    editor
        .handle(&InputEvent::PointerUp {
            x: c.x + 40.0,
            y: c.y + 30.0,
            time_ms: 32.0,
        })
        .unwrap();
    assert_eq!(editor.history().len(), after_delete);

    // The first undo brings the element back where the drag left it.
    editor.undo().unwrap();
    assert_eq!(editor.scene().len(), 1);
    assert_eq!(editor.scene().element(id).unwrap().position, moved);
}

#[test]
fn add_during_press_drops_the_press() {
    let mut editor = make_editor();
    let first = editor.add_text().unwrap();
    let c = center(&editor, first);
    editor.handle(&down(c, 0.0, PointerKind::Touch)).unwrap();
    let before = editor.history().len();

    editor.add_text().unwrap();
    assert_eq!(editor.gesture(), &GestureState::Idle);
    assert_eq!(editor.history().len(), before + 1);
    editor
        .handle(&InputEvent::PointerMove {
            x: c.x + 10.0,
            y: c.y,
            time_ms: 16.0,
        })
        .unwrap();
    assert_eq!(editor.history().len(), before + 1);
}
