//! Freehand drawing shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::{point_to_polyline_dist, points_bounds};
use crate::surface::Surface;
use kurbo::{BezPath, Cap, Join, Point, Rect, Stroke, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand pen stroke (series of points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    pub(crate) id: ShapeId,
    /// Where the stroke started; stands in for the bounds when there are no points.
    pub origin: Point,
    /// Points in the freehand path.
    pub points: Vec<Point>,
    /// Rotation angle in radians (around the center of the point bounds).
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(skip)]
    pub selected: bool,
}

impl Freehand {
    /// Minimum hit distance, so thin strokes stay selectable.
    pub const MIN_HIT_TOLERANCE: f64 = 5.0;

    /// Start a new stroke at `origin`, with the origin as its first point.
    pub fn new(origin: Point) -> Self {
        Self::from_points(vec![origin])
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin: points.first().copied().unwrap_or(Point::ZERO),
            points,
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

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Bounds of a point stroke, collapsing to `origin` when there are no points.
pub(super) fn stroke_bounds(origin: Point, points: &[Point]) -> Rect {
    points_bounds(points).unwrap_or_else(|| Rect::from_points(origin, origin))
}

/// Open polyline through the points, or `None` when there is nothing to stroke.
pub(super) fn polyline(points: &[Point]) -> Option<BezPath> {
    if points.len() < 2 {
        return None;
    }
    let mut path = BezPath::new();
    path.move_to(points[0]);
    for point in &points[1..] {
        path.line_to(*point);
    }
    Some(path)
}

/// Round-capped stroke used by pen-like shapes.
pub(super) fn round_stroke(width: f64) -> Stroke {
    Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round)
}

impl ShapeTrait for Freehand {
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
        let tolerance = Self::MIN_HIT_TOLERANCE.max(self.style.line_width / 2.0);
        point_to_polyline_dist(point, &self.points) <= tolerance
    }

    fn draw_local(&self, surface: &mut dyn Surface) {
        if let Some(path) = polyline(&self.points) {
            surface.stroke_path(&path, self.style.stroke_color.into(), &round_stroke(self.style.line_width));
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
