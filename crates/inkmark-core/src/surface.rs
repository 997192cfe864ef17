//! Drawing-surface abstraction.
//!
//! Shapes and the transformer draw through [`Surface`], which mirrors the
//! immediate-mode 2D canvas the annotation layer sits on: a save/restore
//! state stack, a current transform, stroke/fill of paths, and text.
//! Concrete surfaces live in the render crate.

use crate::shapes::{SerializableColor, Shape};
use kurbo::{Affine, BezPath, Point, Stroke};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Opaque handle to an externally generated fill pattern.
///
/// The core stores and forwards it, never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternHandle(pub u64);

/// Opaque handle to a background raster owned by the boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub u64);

/// Paint source for strokes and fills.
#[derive(Debug, Clone, Copy)]
pub enum Paint {
    Solid(Color),
    Pattern(PatternHandle),
}

impl From<SerializableColor> for Paint {
    fn from(color: SerializableColor) -> Self {
        Paint::Solid(color.into())
    }
}

/// What sits underneath every shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Plain fill.
    Solid(SerializableColor),
    /// A loaded image, stretched to the surface.
    Image(ImageHandle),
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(SerializableColor::white())
    }
}

/// A 2D drawing target.
pub trait Surface {
    /// Push the current transform onto the state stack.
    fn save(&mut self);

    /// Pop the state stack, restoring the transform saved by the matching `save`.
    fn restore(&mut self);

    /// Post-multiply the current transform (`current = current * affine`).
    fn transform(&mut self, affine: Affine);

    /// Clear the whole surface to the background.
    fn draw_background(&mut self, background: &Background);

    /// Stroke a path in the current coordinate space.
    fn stroke_path(&mut self, path: &BezPath, paint: Paint, stroke: &Stroke);

    /// Fill a path in the current coordinate space.
    fn fill_path(&mut self, path: &BezPath, paint: Paint);

    /// Fill a single line of text; `origin` is the top-left of the line box.
    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, font_family: &str, color: Color);

    /// Measure the advance width of a single line of text.
    fn measure_text(&self, text: &str, font_size: f64, font_family: &str) -> f64;
}

/// Source of mosaic fill patterns.
///
/// Called when a pixelation stroke starts, with the shapes currently on the canvas.
pub trait PatternProvider {
    fn create_pattern(&mut self, shapes: &[Shape]) -> Option<PatternHandle>;
}
