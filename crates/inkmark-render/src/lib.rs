//! Inkmark Render Library
//!
//! Concrete drawing surfaces and raster resources for the inkmark core.

mod display_list;
mod pixelate;

use thiserror::Error;

pub use display_list::{DEFAULT_CHAR_ADVANCE, DisplayList, DrawCommand};
pub use pixelate::{PixelatePatterns, pixelate};

/// Render errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Image has no pixels")]
    EmptyImage,
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
