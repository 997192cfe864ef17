//! Geometry helpers shared by shapes and the transformer.

use kurbo::{Affine, Point, Rect, Vec2};

/// Distance from a point to a line segment (a→b).
///
/// A zero-length segment is treated as the single point `a`.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
///
/// Returns `f64::INFINITY` when there are fewer than two points.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Bring a world-space point into the unrotated frame of something rotated by
/// `rotation` radians about `center`.
pub fn to_local(point: Point, center: Point, rotation: f64) -> Point {
    if rotation == 0.0 {
        return point;
    }
    Affine::rotate_about(-rotation, center) * point
}

/// Point-in-rectangle test for a rectangle rotated by `rotation` about its own center.
/// Edges are inclusive.
pub fn point_in_rotated_rect(point: Point, rect: Rect, rotation: f64) -> bool {
    let local = to_local(point, rect.center(), rotation);
    contains_inclusive(rect, local)
}

/// Inclusive containment (kurbo's `Rect::contains` excludes the far edges).
pub fn contains_inclusive(rect: Rect, point: Point) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Axis-aligned bounds of a point set, or `None` when empty.
pub fn points_bounds(points: &[Point]) -> Option<Rect> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .skip(1)
            .fold(Rect::from_points(first, first), |acc, p| acc.union_pt(*p)),
    )
}

/// Union of a sequence of rectangles, or `None` when empty.
pub fn union_bounds(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|acc, r| acc.union(r))
}

/// Unit vector for an angle in radians.
pub fn direction(angle: f64) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
