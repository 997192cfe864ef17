//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::contains_inclusive;
use crate::surface::Surface;
use kurbo::{Point, Rect, Shape as KurboShape, Stroke, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An outlined rectangle.
///
/// Width and height may be negative while the user drags up or left from the
/// starting corner; [`Rectangle::normalize`] folds them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Corner the rectangle was started from.
    pub position: Point,
    /// Signed width.
    pub width: f64,
    /// Signed height.
    pub height: f64,
    /// Rotation angle in radians (around center).
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(skip)]
    pub selected: bool,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
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

    /// Get the rectangle as a kurbo Rect with positive extents.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
        .abs()
    }

    /// Fold negative width/height into the position.
    pub fn normalize(&mut self) {
        let rect = self.as_rect();
        self.position = rect.origin();
        self.width = rect.width();
        self.height = rect.height();
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn center(&self) -> Point {
        Point::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn contains_local(&self, point: Point) -> bool {
        contains_inclusive(self.as_rect(), point)
    }

    fn draw_local(&self, surface: &mut dyn Surface) {
        let path = self.as_rect().to_path(0.1);
        surface.stroke_path(&path, self.style.stroke_color.into(), &Stroke::new(self.style.line_width));
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn resize(&mut self, target: Point) {
        self.width = target.x - self.position.x;
        self.height = target.y - self.position.y;
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
