//! Pixelation (mosaic) brush stroke.

use super::freehand::{polyline, round_stroke, stroke_bounds};
use super::{SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::{contains_inclusive, point_to_polyline_dist};
use crate::surface::{Paint, PatternHandle, Surface};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Paint used when no mosaic pattern was supplied.
const FALLBACK_COLOR: SerializableColor = SerializableColor::new(0, 0, 0, 26);

/// A brush stroke that reveals a pixelated copy of what lies underneath.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pixelate {
    pub(crate) id: ShapeId,
    /// Where the stroke started; stands in for the bounds when there are no points.
    pub origin: Point,
    /// Points in the brush path.
    pub points: Vec<Point>,
    /// Mosaic pattern to stroke with.
    #[serde(skip)]
    pub pattern: Option<PatternHandle>,
    /// Rotation angle in radians (around the center of the point bounds).
    #[serde(default)]
    pub rotation: f64,
    /// Style properties; `line_width` is the brush diameter.
    pub style: ShapeStyle,
    #[serde(skip)]
    pub selected: bool,
}

impl Pixelate {
    /// Start a new brush stroke at `origin`.
    pub fn new(origin: Point, pattern: Option<PatternHandle>) -> Self {
        let mut brush = Self::from_points(vec![origin]);
        brush.pattern = pattern;
        brush
    }

    /// Create from existing points, without a pattern.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin: points.first().copied().unwrap_or(Point::ZERO),
            points,
            pattern: None,
            rotation: 0.0,
            style: ShapeStyle::default(),
            selected: false,
        }
    }

    /// Builder-style style override.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    fn paint(&self) -> Paint {
        match self.pattern {
            Some(handle) => Paint::Pattern(handle),
            None => FALLBACK_COLOR.into(),
        }
    }
}

impl ShapeTrait for Pixelate {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn center(&self) -> Point {
        stroke_bounds(self.origin, &self.points).center()
    }

    fn bounds(&self) -> Rect {
        stroke_bounds(self.origin, &self.points)
    }

    fn contains_local(&self, point: Point) -> bool {
        let width = self.style.line_width;
        let reach = self.bounds().inflate(width, width);
        if !contains_inclusive(reach, point) {
            return false;
        }
        point_to_polyline_dist(point, &self.points) <= width / 2.0
    }

    fn draw_local(&self, surface: &mut dyn Surface) {
        if let Some(path) = polyline(&self.points) {
            surface.stroke_path(&path, self.paint(), &round_stroke(self.style.line_width));
        }
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
        self.origin += delta;
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
    fn test_hit_test_uses_half_brush_width() {
        let mut brush = Pixelate::from_points(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        brush.style.line_width = 8.0;
        assert!(brush.contains_local(Point::new(50.0, 4.0)));
        assert!(!brush.contains_local(Point::new(50.0, 5.0)));
        assert!(!brush.contains_local(Point::new(500.0, 0.0)));
    }

    #[test]
    fn test_clone_keeps_pattern() {
        let brush = Pixelate::new(Point::new(1.0, 2.0), Some(PatternHandle(7)));
        let copy = brush.clone();
        assert_eq!(copy.pattern, Some(PatternHandle(7)));
        assert_eq!(copy.points, vec![Point::new(1.0, 2.0)]);
    }

    #[test]
    fn test_pattern_not_serialized() {
        let brush = Pixelate::new(Point::new(1.0, 2.0), Some(PatternHandle(7)));
        let json = serde_json::to_string(&brush).unwrap();
        let back: Pixelate = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pattern, None);
        assert_eq!(back.points, brush.points);
    }
}
