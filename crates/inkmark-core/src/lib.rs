//! Inkmark Core Library
//!
//! Platform-agnostic annotation model for drawing markup over an image:
//! shapes, selection overlay, undo history and the canvas controller.

pub mod canvas;
pub mod config;
pub mod geometry;
pub mod history;
pub mod shapes;
pub mod surface;
pub mod tools;
pub mod transformer;

pub use canvas::{Canvas, TextEditSession};
pub use config::{ConfigError, EditorConfig};
pub use history::{DEFAULT_HISTORY_LIMIT, HistoryManager};
pub use shapes::{ColorParseError, SerializableColor, Shape, ShapeId, ShapeStyle, ShapeTrait};
pub use surface::{Background, ImageHandle, Paint, PatternHandle, PatternProvider, Surface};
pub use tools::{CursorIcon, ToolKind};
pub use transformer::{Corner, HandleHit, Transformer};
