//! Element definitions for the whiteboard.

use kurbo::{Point, Rect, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, unique element identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The kind of a placed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Circle,
    Text,
    Sticky,
}

impl ElementKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Text => "text",
            Self::Sticky => "sticky",
        }
    }

    /// Whether the element carries editable text content.
    pub fn has_content(self) -> bool {
        matches!(self, Self::Text | Self::Sticky)
    }

    /// Whether content may span several lines.
    pub fn is_multiline(self) -> bool {
        self == Self::Sticky
    }
}

/// Sticky note colors. The palette has exactly five entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StickyColor {
    #[serde(rename = "sticky-yellow")]
    Yellow,
    #[serde(rename = "sticky-pink")]
    Pink,
    #[serde(rename = "sticky-blue")]
    Blue,
    #[serde(rename = "sticky-green")]
    Green,
    #[serde(rename = "sticky-orange")]
    Orange,
}

impl StickyColor {
    /// The palette in assignment order.
    pub const PALETTE: [StickyColor; 5] = [
        StickyColor::Yellow,
        StickyColor::Pink,
        StickyColor::Blue,
        StickyColor::Green,
        StickyColor::Orange,
    ];

    /// Color for the element that will be inserted at position `index`.
    pub fn for_index(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }

    /// Serialized name, e.g. `sticky-yellow`.
    pub fn name(self) -> &'static str {
        match self {
            StickyColor::Yellow => "sticky-yellow",
            StickyColor::Pink => "sticky-pink",
            StickyColor::Blue => "sticky-blue",
            StickyColor::Green => "sticky-green",
            StickyColor::Orange => "sticky-orange",
        }
    }

    /// Fill color for rendering.
    pub fn fill(self) -> Color {
        match self {
            StickyColor::Yellow => Color::from_rgba8(254, 240, 138, 255),
            StickyColor::Pink => Color::from_rgba8(251, 207, 232, 255),
            StickyColor::Blue => Color::from_rgba8(191, 219, 254, 255),
            StickyColor::Green => Color::from_rgba8(187, 247, 208, 255),
            StickyColor::Orange => Color::from_rgba8(254, 215, 170, 255),
        }
    }
}

/// A placed object on the canvas.
///
/// Geometry is stored in world space with `(x, y)` as the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<StickyColor>,
}

impl Element {
    /// Create an element without content or color.
    pub fn new(id: ElementId, kind: ElementKind, origin: Point, size: Size) -> Self {
        Self {
            id,
            kind,
            x: origin.x,
            y: origin.y,
            width: size.width.max(0.0),
            height: size.height.max(0.0),
            content: None,
            color: None,
        }
    }

    /// Create a text element.
    pub fn text(id: ElementId, origin: Point, size: Size, content: impl Into<String>) -> Self {
        let mut element = Self::new(id, ElementKind::Text, origin, size);
        element.content = Some(content.into());
        element
    }

    /// Create a sticky note.
    pub fn sticky(
        id: ElementId,
        origin: Point,
        size: Size,
        content: impl Into<String>,
        color: StickyColor,
    ) -> Self {
        let mut element = Self::new(id, ElementKind::Sticky, origin, size);
        element.content = Some(content.into());
        element.color = Some(color);
        element
    }

    /// Create a rectangle or circle spanning two corner points, in any order.
    pub fn from_corners(id: ElementId, kind: ElementKind, p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();

        Self::new(id, kind, Point::new(min_x, min_y), Size::new(width, height))
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }

    /// Inclusive containment test against the bounding box.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Whether all geometry is finite and the size is non-negative.
    pub fn has_valid_geometry(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// Merge the present fields of a patch into this element.
    pub fn apply(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width.max(0.0);
        }
        if let Some(height) = patch.height {
            self.height = height.max(0.0);
        }
        if let Some(content) = &patch.content {
            self.content = Some(content.clone());
        }
        if let Some(color) = patch.color {
            self.color = Some(color);
        }
    }
}

/// A partial update: only the fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub content: Option<String>,
    pub color: Option<StickyColor>,
}

impl ElementPatch {
    pub fn position(origin: Point) -> Self {
        Self {
            x: Some(origin.x),
            y: Some(origin.y),
            ..Self::default()
        }
    }

    pub fn size(size: Size) -> Self {
        Self {
            width: Some(size.width),
            height: Some(size.height),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::new(
            ElementId::new("r"),
            ElementKind::Rectangle,
            Point::new(x, y),
            Size::new(w, h),
        )
    }

    #[test]
    fn test_from_corners_any_direction() {
        let e = Element::from_corners(
            ElementId::new("a"),
            ElementKind::Circle,
            Point::new(10.0, 10.0),
            Point::new(5.0, 5.0),
        );
        assert_eq!(e.origin(), Point::new(5.0, 5.0));
        assert_eq!(e.size(), Size::new(5.0, 5.0));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let e = rect(0.0, 0.0, 10.0, 20.0);
        assert!(e.contains(Point::new(0.0, 0.0)));
        assert!(e.contains(Point::new(10.0, 20.0)));
        assert!(e.contains(Point::new(5.0, 5.0)));
        assert!(!e.contains(Point::new(10.01, 5.0)));
        assert!(!e.contains(Point::new(5.0, -0.01)));
    }

    #[test]
    fn test_new_clamps_negative_size() {
        let e = rect(0.0, 0.0, -3.0, 4.0);
        assert!(e.width.abs() < f64::EPSILON);
        assert!((e.height - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_patch_leaves_other_fields() {
        let mut e = Element::text(
            ElementId::new("t"),
            Point::new(1.0, 2.0),
            Size::new(200.0, 40.0),
            "hello",
        );
        e.apply(&ElementPatch::position(Point::new(7.0, 8.0)));
        assert_eq!(e.origin(), Point::new(7.0, 8.0));
        assert_eq!(e.content.as_deref(), Some("hello"));
        assert_eq!(e.size(), Size::new(200.0, 40.0));

        e.apply(&ElementPatch::size(Size::new(-1.0, 5.0)));
        assert!(e.width.abs() < f64::EPSILON);
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(StickyColor::for_index(0), StickyColor::Yellow);
        assert_eq!(StickyColor::for_index(4), StickyColor::Orange);
        assert_eq!(StickyColor::for_index(5), StickyColor::Yellow);
        assert_eq!(StickyColor::for_index(12), StickyColor::Blue);
    }

    #[test]
    fn test_json_shape() {
        let sticky = Element::sticky(
            ElementId::new("abc"),
            Point::new(1.0, 2.0),
            Size::new(150.0, 150.0),
            "note",
            StickyColor::Pink,
        );
        let value = serde_json::to_value(&sticky).unwrap();
        assert_eq!(value["type"], "sticky");
        assert_eq!(value["color"], "sticky-pink");
        assert_eq!(value["id"], "abc");

        let shape = rect(0.0, 0.0, 1.0, 1.0);
        let value = serde_json::to_value(&shape).unwrap();
        assert!(value.get("content").is_none());
        assert!(value.get("color").is_none());
    }

    #[test]
    fn test_invalid_geometry() {
        let mut e = rect(0.0, 0.0, 1.0, 1.0);
        assert!(e.has_valid_geometry());
        e.width = -1.0;
        assert!(!e.has_valid_geometry());
        e.width = f64::NAN;
        assert!(!e.has_valid_geometry());
    }

    #[test]
    fn test_names_match_serialized_form() {
        for color in StickyColor::PALETTE {
            assert_eq!(serde_json::to_string(&color).unwrap(), format!("\"{}\"", color.name()));
        }
        for kind in [ElementKind::Rectangle, ElementKind::Circle, ElementKind::Text, ElementKind::Sticky] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), format!("\"{}\"", kind.name()));
        }
    }
    #[test]
    fn test_palette_fills_are_distinct() {
        let fills: std::collections::HashSet<(u8, u8, u8, u8)> = StickyColor::PALETTE
            .iter()
            .map(|color| {
                let rgba = color.fill().to_rgba8();
                (rgba.r, rgba.g, rgba.b, rgba.a)
            })
            .collect();
        assert_eq!(fills.len(), StickyColor::PALETTE.len());

        let yellow = StickyColor::Yellow.fill().to_rgba8();
        assert_eq!((yellow.r, yellow.g, yellow.b, yellow.a), (254, 240, 138, 255));
    }
}
