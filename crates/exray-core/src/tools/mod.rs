//! Drawing tools and the transient state of a gesture.

use crate::input::Key;
use crate::shapes::{ShapeId, INVALID_ID};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Interaction state of the canvas handler. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    DrawRect,
    DrawDiamond,
    DrawEllipse,
    DrawArrowLine,
    DrawLine,
}

impl ToolKind {
    /// All tools in key binding order.
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Select,
        ToolKind::DrawRect,
        ToolKind::DrawDiamond,
        ToolKind::DrawEllipse,
        ToolKind::DrawArrowLine,
        ToolKind::DrawLine,
    ];

    /// Tool bound to a number key.
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Digit1 => Some(ToolKind::Select),
            Key::Digit2 => Some(ToolKind::DrawRect),
            Key::Digit3 => Some(ToolKind::DrawDiamond),
            Key::Digit4 => Some(ToolKind::DrawEllipse),
            Key::Digit5 => Some(ToolKind::DrawArrowLine),
            Key::Digit6 => Some(ToolKind::DrawLine),
            Key::Escape => None,
        }
    }

    /// Key that activates this tool.
    pub fn key(self) -> Key {
        match self {
            ToolKind::Select => Key::Digit1,
            ToolKind::DrawRect => Key::Digit2,
            ToolKind::DrawDiamond => Key::Digit3,
            ToolKind::DrawEllipse => Key::Digit4,
            ToolKind::DrawArrowLine => Key::Digit5,
            ToolKind::DrawLine => Key::Digit6,
        }
    }

    /// Multi-click tools that build a polyline point by point.
    pub fn is_polyline(self) -> bool {
        matches!(self, ToolKind::DrawArrowLine | ToolKind::DrawLine)
    }

    pub fn is_drawing(self) -> bool {
        self != ToolKind::Select
    }

    pub fn label(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::DrawRect => "Rectangle",
            ToolKind::DrawDiamond => "Diamond",
            ToolKind::DrawEllipse => "Ellipse",
            ToolKind::DrawArrowLine => "Arrow",
            ToolKind::DrawLine => "Line",
        }
    }
}

/// Cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Crosshair,
}

/// Transient state of the shape currently being drawn.
#[derive(Debug, Clone)]
pub struct DrawAttributes {
    /// World-space points committed so far. The first one is the anchor.
    pub points: Vec<Point>,
    /// The shape is complete and the handler should return to select.
    pub line_done: bool,
    /// A line gesture is still in its initial press-drag phase.
    pub is_dragging: bool,
    /// Shape under construction, [`INVALID_ID`] when none.
    pub id: ShapeId,
    /// Drag distance below which a line release counts as a click.
    pub distance_threshold: f64,
}

impl DrawAttributes {
    pub fn new(distance_threshold: f64) -> Self {
        Self {
            points: Vec::new(),
            line_done: false,
            is_dragging: false,
            id: INVALID_ID,
            distance_threshold,
        }
    }

    /// Forget the gesture. The threshold is kept.
    pub fn reset(&mut self) {
        self.points.clear();
        self.line_done = false;
        self.is_dragging = false;
        self.id = INVALID_ID;
    }

    /// Whether a shape is being built.
    pub fn is_active(&self) -> bool {
        self.id != INVALID_ID
    }

    pub fn anchor(&self) -> Option<Point> {
        self.points.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings_roundtrip() {
        for tool in ToolKind::ALL {
            assert_eq!(ToolKind::from_key(tool.key()), Some(tool));
        }
        assert_eq!(ToolKind::from_key(Key::Escape), None);
    }

    #[test]
    fn test_polyline_tools() {
        assert!(ToolKind::DrawLine.is_polyline());
        assert!(ToolKind::DrawArrowLine.is_polyline());
        assert!(!ToolKind::DrawRect.is_polyline());
        assert!(!ToolKind::Select.is_drawing());
    }

    #[test]
    fn test_reset_keeps_threshold() {
        let mut attrs = DrawAttributes::new(8.0);
        attrs.id = 4;
        attrs.points.push(Point::new(1.0, 2.0));
        attrs.is_dragging = true;
        attrs.line_done = true;
        assert!(attrs.is_active());
        assert_eq!(attrs.anchor(), Some(Point::new(1.0, 2.0)));

        attrs.reset();
        assert!(!attrs.is_active());
        assert!(attrs.points.is_empty());
        assert!(!attrs.is_dragging);
        assert!(!attrs.line_done);
        assert!((attrs.distance_threshold - 8.0).abs() < f64::EPSILON);
    }
}
