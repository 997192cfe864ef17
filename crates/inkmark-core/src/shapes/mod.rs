//! Annotation shapes.

mod arrow;
mod ellipse;
mod freehand;
mod pixelate;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use ellipse::Ellipse;
pub use freehand::Freehand;
pub use pixelate::Pixelate;
pub use rectangle::Rectangle;
pub use text::Text;

use crate::geometry::to_local;
use crate::surface::Surface;
use crate::transformer::Corner;
use kurbo::{Affine, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}: expected #rgb, #rrggbb, #rrggbbaa or a named color")]
pub struct ColorParseError(pub String);

/// Serializable color representation (RGBA8).
///
/// Round-trips through CSS-style hex strings, which is also its serde form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn red() -> Self {
        Self::new(255, 0, 0, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name {
            "black" => Self::black(),
            "white" => Self::white(),
            "red" => Self::red(),
            "green" => Self::new(0, 128, 0, 255),
            "blue" => Self::new(0, 0, 255, 255),
            "yellow" => Self::new(255, 255, 0, 255),
            "orange" => Self::new(255, 165, 0, 255),
            "transparent" => Self::transparent(),
            _ => return None,
        };
        Some(color)
    }
}

impl FromStr for SerializableColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ColorParseError(s.to_string());

        let Some(hex) = trimmed.strip_prefix('#') else {
            return Self::named(&trimmed.to_ascii_lowercase()).ok_or_else(err);
        };
        if !hex.is_ascii() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| err());
        match hex.len() {
            3 => Ok(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_string()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by every shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color (also the fill color of text and arrowheads).
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub line_width: f64,
}

impl ShapeStyle {
    pub fn new(stroke_color: SerializableColor, line_width: f64) -> Self {
        Self {
            stroke_color,
            line_width,
        }
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::new(SerializableColor::red(), 2.0)
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Per-variant behavior, expressed in the shape's own unrotated frame.
///
/// [`Shape`] layers the rotation contract on top: it rotates the surface about
/// [`ShapeTrait::center`] before `draw_local`, and inverse-rotates query points
/// before `contains_local`.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Pivot for rotation and the transformer box.
    fn center(&self) -> Point;

    /// Unrotated axis-aligned bounding box.
    fn bounds(&self) -> Rect;

    /// Hit test against the unrotated geometry.
    fn contains_local(&self, point: Point) -> bool;

    /// Emit draw commands in the unrotated frame.
    fn draw_local(&self, surface: &mut dyn Surface);

    /// Translate every coordinate the shape owns.
    fn translate(&mut self, delta: Vec2);

    /// Drag-to-size. Shapes that cannot be resized ignore it.
    fn resize(&mut self, target: Point);

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;
}

/// Enum wrapper for all shape kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Arrow(Arrow),
    Freehand(Freehand),
    Pixelate(Pixelate),
    Text(Text),
}

impl Shape {
    fn as_trait(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Arrow(s) => s,
            Shape::Freehand(s) => s,
            Shape::Pixelate(s) => s,
            Shape::Text(s) => s,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Rectangle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Arrow(s) => s,
            Shape::Freehand(s) => s,
            Shape::Pixelate(s) => s,
            Shape::Text(s) => s,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.as_trait().id()
    }

    pub fn center(&self) -> Point {
        self.as_trait().center()
    }

    /// Unrotated bounding box.
    pub fn bounds(&self) -> Rect {
        self.as_trait().bounds()
    }

    pub fn style(&self) -> &ShapeStyle {
        self.as_trait().style()
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        self.as_trait_mut().style_mut()
    }

    /// Get the rotation angle in radians.
    pub fn rotation(&self) -> f64 {
        match self {
            Shape::Rectangle(s) => s.rotation,
            Shape::Ellipse(s) => s.rotation,
            Shape::Arrow(s) => s.rotation,
            Shape::Freehand(s) => s.rotation,
            Shape::Pixelate(s) => s.rotation,
            Shape::Text(s) => s.rotation,
        }
    }

    /// Set the rotation angle in radians.
    pub fn set_rotation(&mut self, rotation: f64) {
        match self {
            Shape::Rectangle(s) => s.rotation = rotation,
            Shape::Ellipse(s) => s.rotation = rotation,
            Shape::Arrow(s) => s.rotation = rotation,
            Shape::Freehand(s) => s.rotation = rotation,
            Shape::Pixelate(s) => s.rotation = rotation,
            Shape::Text(s) => s.rotation = rotation,
        }
    }

    pub fn is_selected(&self) -> bool {
        match self {
            Shape::Rectangle(s) => s.selected,
            Shape::Ellipse(s) => s.selected,
            Shape::Arrow(s) => s.selected,
            Shape::Freehand(s) => s.selected,
            Shape::Pixelate(s) => s.selected,
            Shape::Text(s) => s.selected,
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        match self {
            Shape::Rectangle(s) => s.selected = selected,
            Shape::Ellipse(s) => s.selected = selected,
            Shape::Arrow(s) => s.selected = selected,
            Shape::Freehand(s) => s.selected = selected,
            Shape::Pixelate(s) => s.selected = selected,
            Shape::Text(s) => s.selected = selected,
        }
    }

    /// Draw with the shape's rotation applied about its center.
    pub fn draw(&self, surface: &mut dyn Surface) {
        if let Shape::Text(text) = self {
            text.layout(&*surface);
        }
        let rotation = self.rotation();
        surface.save();
        if rotation != 0.0 {
            surface.transform(Affine::rotate_about(rotation, self.center()));
        }
        self.as_trait().draw_local(surface);
        surface.restore();
    }

    /// Rotation-aware hit test in world coordinates.
    pub fn hit_test(&self, point: Point) -> bool {
        let local = to_local(point, self.center(), self.rotation());
        self.as_trait().contains_local(local)
    }

    /// Translate by `(dx, dy)`.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.as_trait_mut().translate(Vec2::new(dx, dy));
    }

    /// Drag-to-size used while a shape is being drawn.
    pub fn resize(&mut self, target: Point) {
        self.as_trait_mut().resize(target);
    }

    /// Resize by dragging one of the transformer's corner handles.
    ///
    /// The opposite corner (or, for arrows, the endpoint left alone) keeps its
    /// world position, so repeated calls during one drag do not drift.
    pub fn resize_from_corner(&mut self, corner: Corner, target: Point) {
        let rotation = self.rotation();
        let center = self.center();
        let local = to_local(target, center, rotation);
        let bounds = self.bounds();
        let anchor = corner.opposite().point_of(bounds);
        let pinned = match self {
            Shape::Rectangle(rect) => {
                let span = Rect::from_points(anchor, local);
                rect.position = span.origin();
                rect.width = span.width();
                rect.height = span.height();
                anchor
            }
            Shape::Ellipse(ellipse) => {
                let span = Rect::from_points(anchor, local);
                ellipse.center = span.center();
                ellipse.radius_x = span.width() / 2.0;
                ellipse.radius_y = span.height() / 2.0;
                anchor
            }
            Shape::Arrow(arrow) => {
                let grabbed = corner.point_of(bounds);
                if (grabbed - arrow.start).hypot2() < (grabbed - arrow.end).hypot2() {
                    arrow.start = local;
                    arrow.end
                } else {
                    arrow.end = local;
                    arrow.start
                }
            }
            Shape::Freehand(_) | Shape::Pixelate(_) | Shape::Text(_) => return,
        };

        // The pivot moved with the new extents; shift back so the pinned point stays put
        if rotation != 0.0 {
            let before = Affine::rotate_about(rotation, center) * pinned;
            let after = Affine::rotate_about(rotation, self.center()) * pinned;
            self.as_trait_mut().translate(before - after);
        }
    }

    /// Rewrite negative extents into an equivalent positive form.
    pub fn normalize(&mut self) {
        if let Shape::Rectangle(rect) = self {
            rect.normalize();
        }
    }

    /// Whether the transformer shows corner handles for this shape.
    pub fn has_corner_handles(&self) -> bool {
        !matches!(self, Shape::Text(_))
    }

    /// Whether dragging a corner handle changes the geometry.
    pub fn supports_resize(&self) -> bool {
        matches!(self, Shape::Rectangle(_) | Shape::Ellipse(_) | Shape::Arrow(_))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Shape::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Short lowercase name for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => "rectangle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Arrow(_) => "arrow",
            Shape::Freehand(_) => "freehand",
            Shape::Pixelate(_) => "pixelate",
            Shape::Text(_) => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn sample_shapes() -> Vec<Shape> {
        vec![
            Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 100.0, 50.0)),
            Shape::Ellipse(Ellipse::new(Point::new(0.0, 0.0), 10.0, 5.0)),
            Shape::Arrow(Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0))),
            Shape::Freehand(Freehand::from_points(vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 10.0),
            ])),
            Shape::Pixelate(Pixelate::from_points(vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 10.0),
            ])),
            Shape::Text(Text::new(Point::new(0.0, 0.0), "hello".to_string())),
        ]
    }

    #[test]
    fn test_color_parse() {
        assert_eq!("#ff0000".parse::<SerializableColor>(), Ok(SerializableColor::red()));
        assert_eq!("#fff".parse::<SerializableColor>(), Ok(SerializableColor::white()));
        assert_eq!(
            "#00000080".parse::<SerializableColor>(),
            Ok(SerializableColor::new(0, 0, 0, 128))
        );
        assert_eq!("Blue".parse::<SerializableColor>(), Ok(SerializableColor::new(0, 0, 255, 255)));
        assert!("#ff00".parse::<SerializableColor>().is_err());
        assert!("#gg0000".parse::<SerializableColor>().is_err());
        assert!("chartreuse-ish".parse::<SerializableColor>().is_err());
    }

    #[test]
    fn test_color_display() {
        assert_eq!(SerializableColor::red().to_string(), "#ff0000");
        assert_eq!(SerializableColor::new(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_color_serde_as_string() {
        let json = serde_json::to_string(&SerializableColor::red()).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: SerializableColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SerializableColor::red());
        assert!(serde_json::from_str::<SerializableColor>("\"nope\"").is_err());
    }

    #[test]
    fn test_clone_independence() {
        for shape in sample_shapes() {
            let original = shape.clone();
            let mut copy = shape.clone();
            copy.move_by(7.0, -3.0);
            copy.style_mut().line_width = 9.0;
            assert_eq!(shape, original, "{} clone aliased its source", shape.kind_name());
            assert_ne!(copy, original);
        }
    }

    #[test]
    fn test_clone_independence_of_points() {
        let shape = Shape::Freehand(Freehand::from_points(vec![Point::new(1.0, 1.0)]));
        let mut copy = shape.clone();
        if let Shape::Freehand(freehand) = &mut copy {
            freehand.add_point(Point::new(5.0, 5.0));
        }
        match &shape {
            Shape::Freehand(freehand) => assert_eq!(freehand.points.len(), 1),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_rotated_rectangle_hit_test() {
        let mut shape = Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 100.0, 50.0));
        assert!(shape.hit_test(Point::new(50.0, 25.0)));
        assert!(!shape.hit_test(Point::new(150.0, 150.0)));

        // Near the top-left corner: inside before rotation, outside after a quarter turn
        let corner = Point::new(5.0, 5.0);
        assert!(shape.hit_test(corner));
        shape.set_rotation(FRAC_PI_2);
        assert!(!shape.hit_test(corner));
        // The box now stands upright around its center
        assert!(shape.hit_test(Point::new(50.0, 70.0)));
        assert!(shape.hit_test(Point::new(50.0, 25.0)));
    }

    #[test]
    fn test_resize_unsupported_is_noop() {
        for shape in sample_shapes() {
            if shape.supports_resize() {
                continue;
            }
            let mut resized = shape.clone();
            resized.resize(Point::new(500.0, 500.0));
            resized.resize_from_corner(Corner::BottomRight, Point::new(500.0, 500.0));
            assert_eq!(resized, shape);
        }
    }

    #[test]
    fn test_resize_from_corner_keeps_opposite_anchor() {
        let mut shape = Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 100.0, 50.0));
        shape.resize_from_corner(Corner::TopLeft, Point::new(0.0, 0.0));
        assert_eq!(shape.bounds(), Rect::new(0.0, 0.0, 110.0, 60.0));

        let mut ellipse = Shape::Ellipse(Ellipse::new(Point::new(50.0, 50.0), 10.0, 10.0));
        ellipse.resize_from_corner(Corner::BottomRight, Point::new(100.0, 80.0));
        assert_eq!(ellipse.bounds(), Rect::new(40.0, 40.0, 100.0, 80.0));
    }

    fn world_point(shape: &Shape, local: Point) -> Point {
        Affine::rotate_about(shape.rotation(), shape.center()) * local
    }

    fn assert_near(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_rotated_resize_keeps_opposite_corner_in_place() {
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 50.0);
        rect.rotation = FRAC_PI_2;
        let mut shape = Shape::Rectangle(rect);
        let anchor = world_point(&shape, Corner::BottomRight.point_of(shape.bounds()));
        assert_near(anchor, Point::new(25.0, 75.0));

        let target = Point::new(85.0, -35.0);
        shape.resize_from_corner(Corner::TopLeft, target);
        let bounds = shape.bounds();
        assert!((bounds.width() - 110.0).abs() < 1e-9);
        assert!((bounds.height() - 60.0).abs() < 1e-9);
        assert_near(world_point(&shape, Corner::BottomRight.point_of(bounds)), anchor);
        assert_near(world_point(&shape, Corner::TopLeft.point_of(bounds)), target);

        // Same pointer again, as on a repeated move event
        shape.resize_from_corner(Corner::TopLeft, target);
        assert_near(world_point(&shape, Corner::BottomRight.point_of(shape.bounds())), anchor);
        assert!((shape.bounds().width() - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_ellipse_resize_keeps_opposite_corner_in_place() {
        let mut ellipse = Ellipse::new(Point::new(50.0, 50.0), 20.0, 10.0);
        ellipse.rotation = FRAC_PI_4;
        let mut shape = Shape::Ellipse(ellipse);
        let anchor = world_point(&shape, Corner::TopLeft.point_of(shape.bounds()));

        for target in [Point::new(90.0, 95.0), Point::new(100.0, 110.0)] {
            shape.resize_from_corner(Corner::BottomRight, target);
            let bounds = shape.bounds();
            assert_near(world_point(&shape, Corner::TopLeft.point_of(bounds)), anchor);
            assert_near(world_point(&shape, Corner::BottomRight.point_of(bounds)), target);
        }
    }

    #[test]
    fn test_rotated_arrow_resize_keeps_other_endpoint() {
        let mut arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        arrow.rotation = FRAC_PI_2;
        let mut shape = Shape::Arrow(arrow);
        let Shape::Arrow(before) = &shape else { unreachable!() };
        let fixed = world_point(&shape, before.start);

        shape.resize_from_corner(Corner::BottomRight, Point::new(40.0, 80.0));
        let Shape::Arrow(after) = &shape else { unreachable!() };
        assert_near(world_point(&shape, after.start), fixed);
        assert_near(world_point(&shape, after.end), Point::new(40.0, 80.0));
    }

    #[test]
    fn test_rotated_ellipse_and_arrow_hit_test() {
        // 40x10 ellipse stood upright by a quarter turn
        let mut ellipse = Ellipse::new(Point::new(0.0, 0.0), 20.0, 5.0);
        ellipse.rotation = FRAC_PI_2;
        let ellipse = Shape::Ellipse(ellipse);
        assert!(ellipse.hit_test(Point::new(0.0, 18.0)));
        assert!(!ellipse.hit_test(Point::new(18.0, 0.0)));

        let mut arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        arrow.rotation = FRAC_PI_2;
        let arrow = Shape::Arrow(arrow);
        // Shaft now runs from (50,-50) to (50,50)
        assert!(arrow.hit_test(Point::new(50.0, 40.0)));
        assert!(arrow.hit_test(Point::new(55.0, -40.0)));
        assert!(!arrow.hit_test(Point::new(90.0, 0.0)));
    }

    #[test]
    fn test_arrow_corner_moves_nearest_endpoint() {
        let mut shape = Shape::Arrow(Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0)));
        shape.resize_from_corner(Corner::TopLeft, Point::new(-20.0, -10.0));
        match &shape {
            Shape::Arrow(arrow) => {
                assert_eq!(arrow.start, Point::new(-20.0, -10.0));
                assert_eq!(arrow.end, Point::new(100.0, 100.0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_selected_flag_not_serialized() {
        let mut shape = Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0));
        shape.set_selected(true);
        let json = serde_json::to_string(&shape).unwrap();
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert!(!back.is_selected());
        assert_eq!(back.bounds(), shape.bounds());
    }
}
