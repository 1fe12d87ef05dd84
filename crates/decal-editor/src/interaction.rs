//! Pointer and keyboard gesture state machine.
//!
//! The controller never mutates the scene. It reads the scene, keeps the
//! gesture state, and returns [`Effect`]s for the editor session to apply.
//! Routing is a single `(state, event)` match; every arm names the
//! transition it performs and pairs not listed leave the state unchanged.
//!
//! ```text
//! Idle ──down on element──▶ Pressed ──move──▶ Dragging ──up──▶ Idle (commit)
//!                              │ └──up──▶ Idle
//!                              └──long-press on text──▶ EditingText
//! Idle ──double-click on text──▶ EditingText ──Enter / blur──▶ Idle (commit if changed)
//! ```

use crate::input::{InputEvent, PointerKind};
use decal_core::{ElementId, Point, SceneGraph, Vec2};
use smallvec::SmallVec;

/// A scene change requested by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Select(Option<ElementId>),
    /// Move to an unclamped position; the scene clamps.
    Move { id: ElementId, position: Point },
    /// Live text update while editing; not a history step on its own.
    SetText { id: ElementId, content: String },
    /// Record the current scene as a history entry.
    Commit(&'static str),
}

pub type Effects = SmallVec<[Effect; 4]>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Pressed {
        id: ElementId,
        /// Pointer position minus element origin at press time.
        offset: Vec2,
        origin: Point,
        pressed_at: f64,
        long_press: bool,
    },
    Dragging {
        id: ElementId,
        offset: Vec2,
    },
    EditingText {
        id: ElementId,
        original: String,
        draft: String,
    },
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    state: GestureState,
    long_press_ms: f64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(500.0)
    }
}

impl InteractionController {
    pub fn new(long_press_ms: f64) -> Self {
        Self {
            state: GestureState::Idle,
            long_press_ms,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, GestureState::EditingText { .. })
    }

    /// The element currently being edited in place, if any.
    pub fn editing(&self) -> Option<ElementId> {
        match &self.state {
            GestureState::EditingText { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Drop any gesture without emitting effects. Used after the scene is
    /// replaced wholesale (undo, redo, reset).
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }

    /// End whatever gesture is in flight before an editor action runs.
    ///
    /// A text edit commits if its content changed and a drag commits the
    /// move made so far. A press that never moved ends silently. The
    /// controller is always idle afterwards.
    pub fn interrupt(&mut self) -> Effects {
        let mut effects = Effects::new();
        match std::mem::take(&mut self.state) {
            state @ GestureState::EditingText { .. } => {
                finish_edit(state, &mut effects);
            }
            GestureState::Dragging { .. } => effects.push(Effect::Commit("move")),
            GestureState::Pressed { .. } | GestureState::Idle => {}
        }
        effects
    }

    /// Route one event. `hit` is the topmost element under the event's
    /// position, if it has one.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        hit: Option<ElementId>,
        scene: &SceneGraph,
    ) -> Effects {
        let mut effects = Effects::new();
        let mut state = std::mem::take(&mut self.state);
        if let Some(now) = event.time_ms() {
            state = self.expire_long_press(state, now, scene);
        }

        use GestureState as S;
        use InputEvent as E;
        self.state = match (state, event) {
            (S::Idle, E::PointerDown { x, y, time_ms, kind }) => {
                press(Point::new(*x, *y), *time_ms, *kind, hit, scene, &mut effects)
            }
            (S::Idle, E::DoubleClick { .. }) => begin_edit(hit, scene, &mut effects),

            (
                S::Pressed {
                    id, offset, origin, ..
                },
                E::PointerMove { x, y, .. },
            ) if Point::new(*x, *y) != origin => {
                drag_to(id, offset, Point::new(*x, *y), &mut effects);
                S::Dragging { id, offset }
            }
            (S::Pressed { .. }, E::PointerUp { .. } | E::PointerCancel { .. }) => S::Idle,
            (S::Pressed { id, .. }, E::DoubleClick { .. }) => begin_edit(Some(id), scene, &mut effects),

            (S::Dragging { id, offset }, E::PointerMove { x, y, .. }) => {
                drag_to(id, offset, Point::new(*x, *y), &mut effects);
                S::Dragging { id, offset }
            }
            (S::Dragging { id, offset }, E::PointerUp { x, y, .. }) => {
                drag_to(id, offset, Point::new(*x, *y), &mut effects);
                effects.push(Effect::Commit("move"));
                S::Idle
            }
            (S::Dragging { .. }, E::PointerCancel { .. }) => {
                effects.push(Effect::Commit("move"));
                S::Idle
            }

            (S::EditingText { id, original, .. }, E::TextInput { content }) => {
                effects.push(Effect::SetText {
                    id,
                    content: content.clone(),
                });
                S::EditingText {
                    id,
                    original,
                    draft: content.clone(),
                }
            }
            (state @ S::EditingText { .. }, E::Key { key, shift: false }) if key == "Enter" => {
                finish_edit(state, &mut effects)
            }
            (state @ S::EditingText { .. }, E::Blur) => finish_edit(state, &mut effects),
            (state @ S::EditingText { .. }, E::PointerDown { x, y, time_ms, kind }) => {
                if hit.is_some() && hit == self.editing_id(&state) {
                    // Caret placement inside the edited element.
                    state
                } else {
                    finish_edit(state, &mut effects);
                    press(Point::new(*x, *y), *time_ms, *kind, hit, scene, &mut effects)
                }
            }

            (state, _) => state,
        };
        effects
    }

    fn editing_id(&self, state: &GestureState) -> Option<ElementId> {
        match state {
            GestureState::EditingText { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// A held, unmoved press on text becomes an edit once the long-press
    /// window has elapsed, whichever event reports the time.
    fn expire_long_press(&self, state: GestureState, now: f64, scene: &SceneGraph) -> GestureState {
        match state {
            GestureState::Pressed {
                id,
                pressed_at,
                long_press: true,
                ..
            } if now - pressed_at >= self.long_press_ms => {
                log::debug!("long-press on {id}");
                begin_edit(Some(id), scene, &mut Effects::new())
            }
            other => other,
        }
    }
}

fn press(
    at: Point,
    time_ms: f64,
    kind: PointerKind,
    hit: Option<ElementId>,
    scene: &SceneGraph,
    effects: &mut Effects,
) -> GestureState {
    let Some(element) = hit.and_then(|id| scene.element(id)) else {
        if scene.selected().is_some() {
            effects.push(Effect::Select(None));
        }
        return GestureState::Idle;
    };
    if scene.selected() != Some(element.id) {
        effects.push(Effect::Select(Some(element.id)));
    }
    GestureState::Pressed {
        id: element.id,
        offset: at - element.position,
        origin: at,
        pressed_at: time_ms,
        long_press: element.is_text() && kind.supports_long_press(),
    }
}

fn drag_to(id: ElementId, offset: Vec2, pointer: Point, effects: &mut Effects) {
    effects.push(Effect::Move {
        id,
        position: pointer - offset,
    });
}

fn begin_edit(hit: Option<ElementId>, scene: &SceneGraph, effects: &mut Effects) -> GestureState {
    let Some((id, text)) = hit.and_then(|id| Some((id, scene.element(id)?.as_text()?))) else {
        return GestureState::Idle;
    };
    if scene.selected() != Some(id) {
        effects.push(Effect::Select(Some(id)));
    }
    GestureState::EditingText {
        id,
        original: text.content.clone(),
        draft: text.content.clone(),
    }
}

fn finish_edit(state: GestureState, effects: &mut Effects) -> GestureState {
    if let GestureState::EditingText {
        id,
        original,
        draft,
    } = state
        && draft != original
    {
        log::debug!("text edit on {id} committed");
        effects.push(Effect::Commit("edit text"));
    }
    GestureState::Idle
}
