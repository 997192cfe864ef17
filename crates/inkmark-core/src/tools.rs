//! Tool kinds and pointer cursors.

use crate::transformer::HandleHit;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Ellipse,
    Arrow,
    Pen,
    Text,
    Mosaic,
}

impl ToolKind {
    /// Whether a pointer-down with this tool starts a new shape.
    pub fn creates_shape(self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle | ToolKind::Ellipse | ToolKind::Arrow | ToolKind::Pen | ToolKind::Mosaic
        )
    }

    /// Whether pointer moves extend a point path rather than resize.
    pub fn is_brush(self) -> bool {
        matches!(self, ToolKind::Pen | ToolKind::Mosaic)
    }
}

/// Pointer cursor the boundary layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    Move,
    Crosshair,
    /// Hidden; the canvas draws its own brush outline.
    None,
    ResizeNw,
    ResizeNe,
    ResizeSe,
    ResizeSw,
}

impl CursorIcon {
    /// Cursor for a transformer probe result.
    pub fn for_handle(hit: HandleHit) -> Self {
        match hit {
            HandleHit::Corner(corner) => corner.cursor(),
            HandleHit::Inside => CursorIcon::Move,
            HandleHit::Outside => CursorIcon::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::Corner;

    #[test]
    fn test_tool_classes() {
        assert!(!ToolKind::Select.creates_shape());
        assert!(!ToolKind::Text.creates_shape());
        assert!(ToolKind::Mosaic.creates_shape());
        assert!(ToolKind::Pen.is_brush());
        assert!(!ToolKind::Arrow.is_brush());
        assert_eq!(ToolKind::default(), ToolKind::Select);
    }

    #[test]
    fn test_cursor_for_handle() {
        assert_eq!(CursorIcon::for_handle(HandleHit::Corner(Corner::BottomLeft)), CursorIcon::ResizeSw);
        assert_eq!(CursorIcon::for_handle(HandleHit::Inside), CursorIcon::Move);
        assert_eq!(CursorIcon::for_handle(HandleHit::Outside), CursorIcon::Default);
    }
}
