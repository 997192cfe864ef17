//! Ellipse shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::surface::Surface;
use kurbo::{Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape, Stroke, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Smallest radius used as a divisor in the hit test.
const MIN_HIT_RADIUS: f64 = 1.0;

/// An outlined ellipse anchored at its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    /// Center point.
    pub center: Point,
    /// Horizontal radius (sign ignored).
    pub radius_x: f64,
    /// Vertical radius (sign ignored).
    pub radius_y: f64,
    /// Rotation angle in radians (around center).
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(skip)]
    pub selected: bool,
}

impl Ellipse {
    /// Create a new ellipse.
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius_x,
            radius_y,
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

    /// Get as a kurbo Ellipse.
    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::new(self.center, (self.radius_x.abs(), self.radius_y.abs()), 0.0)
    }
}

impl ShapeTrait for Ellipse {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn center(&self) -> Point {
        self.center
    }

    fn bounds(&self) -> Rect {
        let rx = self.radius_x.abs();
        let ry = self.radius_y.abs();
        Rect::new(
            self.center.x - rx,
            self.center.y - ry,
            self.center.x + rx,
            self.center.y + ry,
        )
    }

    fn contains_local(&self, point: Point) -> bool {
        let rx = self.radius_x.abs().max(MIN_HIT_RADIUS);
        let ry = self.radius_y.abs().max(MIN_HIT_RADIUS);
        let dx = (point.x - self.center.x) / rx;
        let dy = (point.y - self.center.y) / ry;
        dx * dx + dy * dy <= 1.0
    }

    fn draw_local(&self, surface: &mut dyn Surface) {
        let path = self.as_kurbo().to_path(0.1);
        surface.stroke_path(&path, self.style.stroke_color.into(), &Stroke::new(self.style.line_width));
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    fn resize(&mut self, target: Point) {
        self.radius_x = (target.x - self.center.x).abs();
        self.radius_y = (target.y - self.center.y).abs();
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

    #[test]
    fn test_hit_test_boundary_inclusive() {
        let ellipse = Ellipse::new(Point::new(0.0, 0.0), 10.0, 5.0);
        assert!(ellipse.contains_local(Point::new(0.0, 0.0)));
        assert!(ellipse.contains_local(Point::new(10.0, 0.0)));
        assert!(!ellipse.contains_local(Point::new(11.0, 0.0)));
        assert!(ellipse.contains_local(Point::new(0.0, -5.0)));
        assert!(!ellipse.contains_local(Point::new(0.0, 6.0)));
    }

    #[test]
    fn test_zero_radius_does_not_divide_by_zero() {
        let ellipse = Ellipse::new(Point::new(0.0, 0.0), 0.0, 0.0);
        assert!(ellipse.contains_local(Point::new(0.5, 0.5)));
        assert!(!ellipse.contains_local(Point::new(2.0, 0.0)));
    }

    #[test]
    fn test_resize_uses_absolute_offsets() {
        let mut ellipse = Ellipse::new(Point::new(50.0, 50.0), 0.0, 0.0);
        ellipse.resize(Point::new(20.0, 60.0));
        assert!((ellipse.radius_x - 30.0).abs() < f64::EPSILON);
        assert!((ellipse.radius_y - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds() {
        let ellipse = Ellipse::new(Point::new(50.0, 50.0), -30.0, 20.0);
        assert_eq!(ellipse.bounds(), Rect::new(20.0, 30.0, 80.0, 70.0));
    }
}
