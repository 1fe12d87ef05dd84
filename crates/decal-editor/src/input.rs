//! Input abstraction layer.
//!
//! Normalizes mouse, touch and pen events from the host into a single
//! `InputEvent` enum. Coordinates are canvas-local logical pixels and
//! timestamps are host milliseconds (e.g. `performance.now()`).

use decal_core::Point;

/// Which device produced a pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    /// Parse the DOM `PointerEvent.pointerType` string. Unknown types map
    /// to `Mouse`.
    pub fn from_dom(pointer_type: &str) -> Self {
        match pointer_type {
            "touch" => Self::Touch,
            "pen" => Self::Pen,
            _ => Self::Mouse,
        }
    }

    /// Long-press editing is a touch gesture; mice use double-click.
    pub fn supports_long_press(self) -> bool {
        !matches!(self, Self::Mouse)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse down, touch start, pen contact.
    PointerDown {
        x: f64,
        y: f64,
        time_ms: f64,
        kind: PointerKind,
    },
    PointerMove { x: f64, y: f64, time_ms: f64 },
    PointerUp { x: f64, y: f64, time_ms: f64 },
    /// The platform aborted the gesture (touch cancel, lost capture).
    PointerCancel { time_ms: f64 },
    DoubleClick { x: f64, y: f64, time_ms: f64 },
    /// Periodic clock so a held press can turn into a long-press without a
    /// further pointer event.
    Tick { time_ms: f64 },
    /// Full current content of the in-place text editor.
    TextInput { content: String },
    Key { key: String, shift: bool },
    /// The in-place text editor lost focus.
    Blur,
}

impl InputEvent {
    /// Extract position if this is a positioned pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::DoubleClick { x, y, .. } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }

    pub fn time_ms(&self) -> Option<f64> {
        match self {
            Self::PointerDown { time_ms, .. }
            | Self::PointerMove { time_ms, .. }
            | Self::PointerUp { time_ms, .. }
            | Self::PointerCancel { time_ms }
            | Self::DoubleClick { time_ms, .. }
            | Self::Tick { time_ms } => Some(*time_ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_only_for_located_events() {
        let down = InputEvent::PointerDown {
            x: 3.0,
            y: 4.0,
            time_ms: 0.0,
            kind: PointerKind::Touch,
        };
        assert_eq!(down.position(), Some(Point::new(3.0, 4.0)));
        assert_eq!(InputEvent::Tick { time_ms: 9.0 }.position(), None);
        assert_eq!(InputEvent::Blur.time_ms(), None);
    }

    #[test]
    fn dom_pointer_types() {
        assert_eq!(PointerKind::from_dom("touch"), PointerKind::Touch);
        assert_eq!(PointerKind::from_dom("pen"), PointerKind::Pen);
        assert_eq!(PointerKind::from_dom("mouse"), PointerKind::Mouse);
        assert!(!PointerKind::Mouse.supports_long_press());
    }
}
