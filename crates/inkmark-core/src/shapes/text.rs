//! Text shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::contains_inclusive;
use crate::surface::Surface;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use uuid::Uuid;

/// A block of (possibly multi-line) text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Top-left corner of the first line.
    pub position: Point,
    /// The text content; lines are separated by `\n`.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font family name, passed through to the surface.
    pub font_family: String,
    /// Rotation angle in radians (around center).
    #[serde(default)]
    pub rotation: f64,
    /// Style properties; the stroke color is the text color.
    pub style: ShapeStyle,
    #[serde(skip)]
    pub selected: bool,
    /// Block size measured by the surface on the last draw.
    /// If None, approximate bounds are used.
    #[serde(skip)]
    cached_size: Cell<Option<Size>>,
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.position == other.position
            && self.content == other.content
            && self.font_size == other.font_size
            && self.font_family == other.font_family
            && self.rotation == other.rotation
            && self.style == other.style
            && self.selected == other.selected
    }
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";
    /// Line height as a multiple of the font size.
    pub const LINE_HEIGHT: f64 = 1.2;
    /// Average glyph advance as a multiple of the font size, for estimates.
    pub const CHAR_WIDTH_ESTIMATE: f64 = 0.6;

    /// Create a new text shape.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            rotation: 0.0,
            style: ShapeStyle::default(),
            selected: false,
            cached_size: Cell::new(None),
        }
    }

    /// Builder-style style override.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder-style font override.
    pub fn with_font(mut self, font_size: f64, font_family: impl Into<String>) -> Self {
        self.font_size = font_size;
        self.font_family = font_family.into();
        self.invalidate_cache();
        self
    }

    /// Replace the content, dropping any measured size.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.invalidate_cache();
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    pub fn line_height(&self) -> f64 {
        self.font_size * Self::LINE_HEIGHT
    }

    fn block_height(&self) -> f64 {
        self.lines().count() as f64 * self.line_height()
    }

    /// Size from the character-count estimate; used for hit testing.
    pub fn estimated_size(&self) -> Size {
        let width = self
            .lines()
            .map(|line| line.chars().count() as f64 * self.font_size * Self::CHAR_WIDTH_ESTIMATE)
            .fold(0.0, f64::max);
        Size::new(width, self.block_height())
    }

    /// Size measured by the surface, falling back to the estimate.
    pub fn measured_size(&self) -> Size {
        self.cached_size.get().unwrap_or_else(|| self.estimated_size())
    }

    /// Measure the block with the surface and cache the result.
    pub fn layout(&self, surface: &dyn Surface) -> Size {
        let width = self
            .lines()
            .map(|line| surface.measure_text(line, self.font_size, &self.font_family))
            .fold(0.0, f64::max);
        let size = Size::new(width, self.block_height());
        self.cached_size.set(Some(size));
        size
    }

    pub fn invalidate_cache(&self) {
        self.cached_size.set(None);
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn center(&self) -> Point {
        self.bounds().center()
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.measured_size())
    }

    fn contains_local(&self, point: Point) -> bool {
        contains_inclusive(Rect::from_origin_size(self.position, self.estimated_size()), point)
    }

    fn draw_local(&self, surface: &mut dyn Surface) {
        let color = self.style.stroke();
        let line_height = self.line_height();
        for (index, line) in self.lines().enumerate() {
            let origin = Point::new(self.position.x, self.position.y + index as f64 * line_height);
            surface.fill_text(line, origin, self.font_size, &self.font_family, color);
        }
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn resize(&mut self, _target: Point) {}

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimated_size_uses_widest_line() {
        let text = Text::new(Point::new(0.0, 0.0), "ab\nabcd".to_string());
        let size = text.estimated_size();
        assert!((size.width - 4.0 * 20.0 * 0.6).abs() < 1e-9);
        assert!((size.height - 2.0 * 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_estimate() {
        let text = Text::new(Point::new(10.0, 10.0), "hello".to_string());
        // 5 chars * 12 = 60 wide, 24 tall
        assert!(text.contains_local(Point::new(40.0, 20.0)));
        assert!(text.contains_local(Point::new(70.0, 34.0)));
        assert!(!text.contains_local(Point::new(71.0, 20.0)));
        assert!(!text.contains_local(Point::new(40.0, 35.0)));
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let text = Text::new(Point::new(0.0, 0.0), String::new());
        let size = text.estimated_size();
        assert_eq!(size.width, 0.0);
        assert!((size.height - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_equality_ignores_cache() {
        let text = Text::new(Point::new(0.0, 0.0), "hi".to_string());
        let copy = text.clone();
        text.cached_size.set(Some(Size::new(99.0, 99.0)));
        assert_eq!(text, copy);
        assert_eq!(text.measured_size(), Size::new(99.0, 99.0));
        assert_eq!(copy.measured_size(), copy.estimated_size());
    }

    #[test]
    fn test_set_content_invalidates_cache() {
        let mut text = Text::new(Point::new(0.0, 0.0), "hi".to_string());
        text.cached_size.set(Some(Size::new(99.0, 99.0)));
        text.set_content("longer text".to_string());
        assert_eq!(text.measured_size(), text.estimated_size());
    }
}
