//! Tool system for the whiteboard.
//!
//! The active tool only changes through [`ToolManager::set_tool`]; pointer
//! input never switches tools. The manager also owns the single interaction
//! session that lives between pointer-down and pointer-up.

use crate::element::{Element, ElementId, ElementKind};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Rectangle,
    Circle,
    Text,
    Sticky,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Select,
        ToolKind::Pan,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Text,
        ToolKind::Sticky,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Pan => "pan",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Text => "text",
            ToolKind::Sticky => "sticky",
        }
    }

    /// Pointer cursor the canvas should show for this tool.
    pub fn cursor(self) -> CursorIcon {
        match self {
            ToolKind::Select => CursorIcon::Default,
            ToolKind::Pan => CursorIcon::Grab,
            _ => CursorIcon::Crosshair,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for unknown tool names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for ToolKind {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// Cursor hint for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorIcon {
    Default,
    Grab,
    Crosshair,
}

/// What a primary-button press does under the active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDownAction {
    /// Start a pan session.
    StartPan,
    /// Hit-test, then select and start dragging (or clear the selection).
    SelectAt,
    /// Create a fixed-size element immediately.
    Place(ElementKind),
    /// Start sizing a provisional element.
    StartDraw(ElementKind),
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    /// No pointer interaction in progress.
    #[default]
    Idle,
    /// A rectangle/circle is being sized; not yet in the store.
    Draw {
        /// World point where the pointer went down.
        start: Point,
        /// Provisional element, normalized to non-negative size.
        preview: Element,
    },
    /// The selected element follows the pointer.
    Drag {
        id: ElementId,
        /// `pointer_world - element_origin`, fixed at drag start.
        offset: Vec2,
    },
    /// The viewport follows the pointer.
    Pan {
        /// `pointer_screen - pan_offset`, fixed at pan start.
        origin: Vec2,
    },
}

/// Manages the current tool and its state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    current_tool: ToolKind,
    /// Current state of the tool.
    state: ToolState,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_tool(&self) -> ToolKind {
        self.current_tool
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    /// Set the current tool, dropping any session in progress.
    ///
    /// Returns the dropped session so the caller can log it.
    pub fn set_tool(&mut self, tool: ToolKind) -> ToolState {
        self.current_tool = tool;
        std::mem::take(&mut self.state)
    }

    /// Route a primary-button press for the active tool.
    pub fn route_pointer_down(&self) -> PointerDownAction {
        match self.current_tool {
            ToolKind::Pan => PointerDownAction::StartPan,
            ToolKind::Select => PointerDownAction::SelectAt,
            ToolKind::Text => PointerDownAction::Place(ElementKind::Text),
            ToolKind::Sticky => PointerDownAction::Place(ElementKind::Sticky),
            ToolKind::Rectangle => PointerDownAction::StartDraw(ElementKind::Rectangle),
            ToolKind::Circle => PointerDownAction::StartDraw(ElementKind::Circle),
        }
    }

    /// Check if a tool interaction is active.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    /// Begin panning from `pointer_screen` with the current pan offset.
    pub fn begin_pan(&mut self, pointer_screen: Point, pan_offset: Vec2) {
        self.state = ToolState::Pan {
            origin: pointer_screen.to_vec2() - pan_offset,
        };
    }

    /// Begin dragging `id`, whose top-left is at `element_origin`.
    pub fn begin_drag(&mut self, id: ElementId, pointer_world: Point, element_origin: Point) {
        self.state = ToolState::Drag {
            id,
            offset: pointer_world - element_origin,
        };
    }

    /// Begin sizing a new element of `kind` anchored at `pointer_world`.
    pub fn begin_draw(&mut self, id: ElementId, kind: ElementKind, pointer_world: Point) {
        self.state = ToolState::Draw {
            start: pointer_world,
            preview: Element::new(id, kind, pointer_world, Size::ZERO),
        };
    }

    /// New pan offset for the pointer position, if panning.
    pub fn pan_offset_for(&self, pointer_screen: Point) -> Option<Vec2> {
        match &self.state {
            ToolState::Pan { origin } => Some(pointer_screen.to_vec2() - *origin),
            _ => None,
        }
    }

    /// Element id and new origin for the pointer position, if dragging.
    pub fn drag_target(&self, pointer_world: Point) -> Option<(&ElementId, Point)> {
        match &self.state {
            ToolState::Drag { id, offset } => Some((id, pointer_world - *offset)),
            _ => None,
        }
    }

    /// Resize the provisional element so it spans the start point and
    /// `pointer_world`, whichever direction the pointer moved.
    ///
    /// Returns `false` when no draw session is active.
    pub fn update_draw(&mut self, pointer_world: Point) -> bool {
        let ToolState::Draw { start, preview } = &mut self.state else {
            return false;
        };
        *preview = Element::from_corners(preview.id.clone(), preview.kind, *start, pointer_world);
        true
    }

    /// Get the provisional element of a draw session.
    pub fn preview(&self) -> Option<&Element> {
        match &self.state {
            ToolState::Draw { preview, .. } => Some(preview),
            _ => None,
        }
    }

    /// End the current interaction, returning the finished session.
    pub fn end(&mut self) -> ToolState {
        std::mem::take(&mut self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_selection() {
        let mut tm = ToolManager::new();
        assert_eq!(tm.current_tool(), ToolKind::Select);

        tm.set_tool(ToolKind::Rectangle);
        assert_eq!(tm.current_tool(), ToolKind::Rectangle);
    }

    #[test]
    fn test_routing() {
        let mut tm = ToolManager::new();
        let expected = [
            (ToolKind::Select, PointerDownAction::SelectAt),
            (ToolKind::Pan, PointerDownAction::StartPan),
            (ToolKind::Text, PointerDownAction::Place(ElementKind::Text)),
            (ToolKind::Sticky, PointerDownAction::Place(ElementKind::Sticky)),
            (ToolKind::Rectangle, PointerDownAction::StartDraw(ElementKind::Rectangle)),
            (ToolKind::Circle, PointerDownAction::StartDraw(ElementKind::Circle)),
        ];
        for (tool, action) in expected {
            tm.set_tool(tool);
            assert_eq!(tm.route_pointer_down(), action, "tool {tool}");
        }
    }

    #[test]
    fn test_draw_normalizes_direction() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Rectangle);
        tm.begin_draw(ElementId::new("p"), ElementKind::Rectangle, Point::new(10.0, 10.0));
        assert!(tm.is_active());

        assert!(tm.update_draw(Point::new(5.0, 5.0)));
        let preview = tm.preview().unwrap();
        assert_eq!(preview.origin(), Point::new(5.0, 5.0));
        assert_eq!(preview.size(), Size::new(5.0, 5.0));

        tm.update_draw(Point::new(30.0, 2.0));
        let preview = tm.preview().unwrap();
        assert_eq!(preview.origin(), Point::new(10.0, 2.0));
        assert_eq!(preview.size(), Size::new(20.0, 8.0));
    }

    #[test]
    fn test_update_draw_without_session() {
        let mut tm = ToolManager::new();
        assert!(!tm.update_draw(Point::new(1.0, 1.0)));
        assert!(tm.preview().is_none());
    }

    #[test]
    fn test_pan_offset() {
        let mut tm = ToolManager::new();
        tm.begin_pan(Point::new(100.0, 100.0), Vec2::new(20.0, 30.0));
        let offset = tm.pan_offset_for(Point::new(150.0, 90.0)).unwrap();
        assert_eq!(offset, Vec2::new(70.0, 20.0));
    }

    #[test]
    fn test_drag_target_keeps_grab_offset() {
        let mut tm = ToolManager::new();
        tm.begin_drag(ElementId::new("a"), Point::new(15.0, 25.0), Point::new(10.0, 20.0));
        let (id, origin) = tm.drag_target(Point::new(100.0, 100.0)).unwrap();
        assert_eq!(id.as_str(), "a");
        assert_eq!(origin, Point::new(95.0, 95.0));
    }

    #[test]
    fn test_set_tool_drops_session() {
        let mut tm = ToolManager::new();
        tm.begin_drag(ElementId::new("a"), Point::ZERO, Point::ZERO);
        let dropped = tm.set_tool(ToolKind::Pan);
        assert!(matches!(dropped, ToolState::Drag { .. }));
        assert!(!tm.is_active());
        assert!(tm.drag_target(Point::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_end_returns_session() {
        let mut tm = ToolManager::new();
        tm.begin_pan(Point::ZERO, Vec2::ZERO);
        assert!(matches!(tm.end(), ToolState::Pan { .. }));
        assert!(matches!(tm.end(), ToolState::Idle));
    }

    #[test]
    fn test_parse_tool_names() {
        assert_eq!("sticky".parse::<ToolKind>().unwrap(), ToolKind::Sticky);
        assert_eq!("Circle".parse::<ToolKind>().unwrap(), ToolKind::Circle);
        assert!("lasso".parse::<ToolKind>().is_err());
        assert_eq!(ToolKind::Pan.cursor(), CursorIcon::Grab);
    }
}
