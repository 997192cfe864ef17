//! Recording surface.

use inkmark_core::surface::{Background, Paint, Surface};
use kurbo::{Affine, BezPath, Point, Stroke};
use peniko::Color;

/// Default glyph advance as a multiple of the font size.
pub const DEFAULT_CHAR_ADVANCE: f64 = 0.6;

/// One recorded drawing operation, with the transform current when it was issued.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Background(Background),
    Stroke {
        path: BezPath,
        paint: Paint,
        stroke: Stroke,
        transform: Affine,
    },
    Fill {
        path: BezPath,
        paint: Paint,
        transform: Affine,
    },
    Text {
        text: String,
        origin: Point,
        font_size: f64,
        font_family: String,
        color: Color,
        transform: Affine,
    },
}

impl DrawCommand {
    /// Transform in effect for this command (identity for backgrounds).
    pub fn transform(&self) -> Affine {
        match self {
            DrawCommand::Background(_) => Affine::IDENTITY,
            DrawCommand::Stroke { transform, .. }
            | DrawCommand::Fill { transform, .. }
            | DrawCommand::Text { transform, .. } => *transform,
        }
    }
}

/// A [`Surface`] that records commands instead of rasterizing them.
///
/// Useful for tests, and as an intermediate form a backend can replay.
#[derive(Debug, Clone)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    current: Affine,
    stack: Vec<Affine>,
    char_advance: f64,
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayList {
    pub fn new() -> Self {
        Self::with_char_advance(DEFAULT_CHAR_ADVANCE)
    }

    /// Measure text as `chars × advance × font_size`.
    pub fn with_char_advance(char_advance: f64) -> Self {
        Self {
            commands: Vec::new(),
            current: Affine::IDENTITY,
            stack: Vec::new(),
            char_advance,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the list empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of unmatched `save` calls.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current_transform(&self) -> Affine {
        self.current
    }

    /// Drop all commands and reset the state stack.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.stack.clear();
        self.current = Affine::IDENTITY;
    }

    /// Text drawn so far, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(transform) => self.current = transform,
            None => log::warn!("display list: restore without matching save"),
        }
    }

    fn transform(&mut self, affine: Affine) {
        self.current *= affine;
    }

    fn draw_background(&mut self, background: &Background) {
        self.commands.push(DrawCommand::Background(*background));
    }

    fn stroke_path(&mut self, path: &BezPath, paint: Paint, stroke: &Stroke) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            paint,
            stroke: stroke.clone(),
            transform: self.current,
        });
    }

    fn fill_path(&mut self, path: &BezPath, paint: Paint) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            paint,
            transform: self.current,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, font_family: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            font_size,
            font_family: font_family.to_string(),
            color,
            transform: self.current,
        });
    }

    fn measure_text(&self, text: &str, font_size: f64, _font_family: &str) -> f64 {
        text.chars().count() as f64 * font_size * self.char_advance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Shape as _};

    #[test]
    fn test_save_restore_transform() {
        let mut list = DisplayList::new();
        list.save();
        list.transform(Affine::translate((10.0, 0.0)));
        list.save();
        list.transform(Affine::scale(2.0));
        assert_eq!(list.depth(), 2);
        assert_eq!(list.current_transform(), Affine::translate((10.0, 0.0)) * Affine::scale(2.0));
        list.restore();
        assert_eq!(list.current_transform(), Affine::translate((10.0, 0.0)));
        list.restore();
        assert_eq!(list.current_transform(), Affine::IDENTITY);
        assert_eq!(list.depth(), 0);
    }

    #[test]
    fn test_unmatched_restore_is_ignored() {
        let mut list = DisplayList::new();
        list.transform(Affine::translate((5.0, 5.0)));
        list.restore();
        assert_eq!(list.current_transform(), Affine::translate((5.0, 5.0)));
    }

    #[test]
    fn test_commands_capture_transform() {
        let mut list = DisplayList::new();
        let path = Rect::new(0.0, 0.0, 1.0, 1.0).to_path(0.1);
        list.save();
        list.transform(Affine::rotate(1.0));
        list.stroke_path(&path, Paint::Solid(Color::BLACK), &Stroke::new(2.0));
        list.restore();
        list.fill_path(&path, Paint::Solid(Color::WHITE));

        assert_eq!(list.commands()[0].transform(), Affine::rotate(1.0));
        assert_eq!(list.commands()[1].transform(), Affine::IDENTITY);
        match &list.commands()[0] {
            DrawCommand::Stroke { stroke, .. } => assert_eq!(stroke.width, 2.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_measure_text() {
        let list = DisplayList::with_char_advance(0.5);
        assert_eq!(list.measure_text("abcd", 10.0, "Arial"), 20.0);
        assert_eq!(DisplayList::new().measure_text("", 10.0, "Arial"), 0.0);
    }
}
