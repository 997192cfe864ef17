//! Arrow shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::{direction, point_to_segment_dist};
use crate::surface::Surface;
use kurbo::{BezPath, Point, Rect, Stroke, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_6;
use uuid::Uuid;

/// A straight arrow from `start` to `end`, with a filled head at `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub(crate) id: ShapeId,
    /// Start point (tail).
    pub start: Point,
    /// End point (where the arrowhead points).
    pub end: Point,
    /// Rotation angle in radians (around the shaft midpoint).
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(skip)]
    pub selected: bool,
}

impl Arrow {
    /// Length of each arrowhead side.
    pub const HEAD_LENGTH: f64 = 15.0;
    /// Maximum distance from the shaft that still counts as a hit.
    pub const HIT_TOLERANCE: f64 = 10.0;

    /// Create a new arrow.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
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

    /// Closed triangle for the arrowhead.
    pub fn head_path(&self) -> BezPath {
        let shaft = self.end - self.start;
        let angle = shaft.y.atan2(shaft.x);
        let left = self.end - direction(angle - FRAC_PI_6) * Self::HEAD_LENGTH;
        let right = self.end - direction(angle + FRAC_PI_6) * Self::HEAD_LENGTH;

        let mut path = BezPath::new();
        path.move_to(self.end);
        path.line_to(left);
        path.line_to(right);
        path.close_path();
        path
    }
}

impl ShapeTrait for Arrow {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn center(&self) -> Point {
        self.start.midpoint(self.end)
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn contains_local(&self, point: Point) -> bool {
        point_to_segment_dist(point, self.start, self.end) <= Self::HIT_TOLERANCE
    }

    fn draw_local(&self, surface: &mut dyn Surface) {
        let mut shaft = BezPath::new();
        shaft.move_to(self.start);
        shaft.line_to(self.end);
        surface.stroke_path(&shaft, self.style.stroke_color.into(), &Stroke::new(self.style.line_width));
        surface.fill_path(&self.head_path(), self.style.stroke_color.into());
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    fn resize(&mut self, target: Point) {
        self.end = target;
    }

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
    use kurbo::PathEl;

    #[test]
    fn test_arrow_creation() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert_eq!(arrow.center(), Point::new(50.0, 0.0));
        assert_eq!(arrow.bounds(), Rect::new(0.0, 0.0, 100.0, 0.0));
    }

    #[test]
    fn test_hit_test_tolerance() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(arrow.contains_local(Point::new(50.0, 5.0)));
        assert!(arrow.contains_local(Point::new(50.0, 10.0)));
        assert!(!arrow.contains_local(Point::new(50.0, 15.0)));
    }

    #[test]
    fn test_degenerate_arrow() {
        let arrow = Arrow::new(Point::new(10.0, 10.0), Point::new(10.0, 10.0));
        assert!(arrow.contains_local(Point::new(15.0, 10.0)));
        assert!(!arrow.contains_local(Point::new(30.0, 10.0)));
        assert_eq!(arrow.bounds(), Rect::new(10.0, 10.0, 10.0, 10.0));
    }

    #[test]
    fn test_head_points_back_along_shaft() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let points: Vec<Point> = arrow
            .head_path()
            .elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], Point::new(100.0, 0.0));
        for p in &points[1..] {
            assert!(p.x < 100.0);
            assert!(((points[0] - *p).hypot() - Arrow::HEAD_LENGTH).abs() < 1e-9);
        }
    }

    #[test]
    fn test_resize_moves_end() {
        let mut arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        arrow.resize(Point::new(30.0, 40.0));
        assert_eq!(arrow.end, Point::new(30.0, 40.0));
        assert_eq!(arrow.center(), Point::new(15.0, 20.0));
    }
}
