//! Mosaic patterns from a background raster.

use crate::{RenderError, RenderResult};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use inkmark_core::config::EditorConfig;
use inkmark_core::shapes::Shape;
use inkmark_core::surface::{PatternHandle, PatternProvider};

/// Blocky copy of `image`: every `block × block` cell takes a single color.
///
/// The output has the input's dimensions; a block size of 0 is treated as 1.
pub fn pixelate(image: &RgbaImage, block: u32) -> RgbaImage {
    let block = block.max(1);
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || block == 1 {
        return image.clone();
    }
    let small = imageops::resize(image, width.div_ceil(block), height.div_ceil(block), FilterType::Nearest);
    imageops::resize(&small, width, height, FilterType::Nearest)
}

/// [`PatternProvider`] that pixelates the background image.
///
/// Only the background raster is pixelated: shapes already drawn on the canvas
/// are not rasterized into the mosaic, so annotations under a mosaic stroke stay
/// sharp. The mosaic therefore only depends on the background; it is computed on
/// the first request and every handle issued afterwards resolves to it.
///
/// Handles are sequential. Those in `first_live..next_handle` resolve; replacing
/// the source moves `first_live` up, so no per-handle state is kept.
#[derive(Debug, Clone)]
pub struct PixelatePatterns {
    source: RgbaImage,
    block_size: u32,
    mosaic: Option<RgbaImage>,
    first_live: u64,
    next_handle: u64,
}

impl PixelatePatterns {
    pub fn new(source: RgbaImage, block_size: u32) -> Self {
        Self {
            source,
            block_size: block_size.max(1),
            mosaic: None,
            first_live: 1,
            next_handle: 1,
        }
    }

    /// Use the block size from the editor configuration.
    pub fn with_config(source: RgbaImage, config: &EditorConfig) -> Self {
        Self::new(source, config.mosaic_block_size)
    }

    /// Decode an encoded background (PNG, JPEG or WebP).
    pub fn from_encoded(bytes: &[u8], block_size: u32) -> RenderResult<Self> {
        let source = image::load_from_memory(bytes)?.to_rgba8();
        if source.width() == 0 || source.height() == 0 {
            return Err(RenderError::EmptyImage);
        }
        log::debug!("decoded {}x{} background", source.width(), source.height());
        Ok(Self::new(source, block_size))
    }

    pub fn source(&self) -> &RgbaImage {
        &self.source
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Replace the background; previously issued handles stop resolving.
    pub fn set_source(&mut self, source: RgbaImage) {
        self.source = source;
        self.mosaic = None;
        self.first_live = self.next_handle;
    }

    /// Image behind a handle issued by this provider.
    pub fn pattern(&self, handle: PatternHandle) -> Option<&RgbaImage> {
        if (self.first_live..self.next_handle).contains(&handle.0) {
            self.mosaic.as_ref()
        } else {
            None
        }
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        (self.next_handle - self.first_live) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.first_live == self.next_handle
    }
}

impl PatternProvider for PixelatePatterns {
    fn create_pattern(&mut self, _shapes: &[Shape]) -> Option<PatternHandle> {
        if self.source.width() == 0 || self.source.height() == 0 {
            return None;
        }
        if self.mosaic.is_none() {
            self.mosaic = Some(pixelate(&self.source, self.block_size));
            log::debug!("pixelated background with {}px blocks", self.block_size);
        }
        let handle = PatternHandle(self.next_handle);
        self.next_handle += 1;
        Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_blocks_are_uniform() {
        let mosaic = pixelate(&gradient(20, 20), 10);
        assert_eq!(mosaic.dimensions(), (20, 20));
        for (x, y, pixel) in mosaic.enumerate_pixels() {
            let corner = mosaic.get_pixel(x / 10 * 10, y / 10 * 10);
            assert_eq!(pixel, corner, "pixel ({x}, {y}) differs from its block");
        }
        assert_ne!(mosaic.get_pixel(0, 0), mosaic.get_pixel(10, 0));
    }

    #[test]
    fn test_uneven_dimensions_are_kept() {
        let mosaic = pixelate(&gradient(25, 13), 10);
        assert_eq!(mosaic.dimensions(), (25, 13));
    }

    #[test]
    fn test_block_size_one_is_identity() {
        let image = gradient(8, 8);
        assert_eq!(pixelate(&image, 1), image);
        assert_eq!(pixelate(&image, 0), image);
    }

    #[test]
    fn test_handles_resolve_until_source_changes() {
        let mut patterns = PixelatePatterns::new(gradient(20, 20), 10);
        let a = patterns.create_pattern(&[]).unwrap();
        let b = patterns.create_pattern(&[]).unwrap();
        assert_ne!(a, b);
        assert_eq!(patterns.len(), 2);
        assert!(patterns.pattern(a).is_some());
        assert!(patterns.pattern(PatternHandle(999)).is_none());

        patterns.set_source(gradient(4, 4));
        assert!(patterns.pattern(a).is_none());
        assert!(patterns.pattern(b).is_none());
        assert!(patterns.is_empty());

        let c = patterns.create_pattern(&[]).unwrap();
        assert_ne!(c, a);
        assert_ne!(c, b);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns.pattern(c).map(|image| image.dimensions()), Some((4, 4)));
    }

    #[test]
    fn test_shapes_do_not_affect_mosaic() {
        use inkmark_core::shapes::Rectangle;
        use kurbo::Point;

        let mut patterns = PixelatePatterns::new(gradient(20, 20), 10);
        let bare = patterns.create_pattern(&[]).unwrap();
        let shapes = [Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0))];
        let covered = patterns.create_pattern(&shapes).unwrap();
        assert_eq!(patterns.pattern(bare), patterns.pattern(covered));
        assert_eq!(patterns.pattern(covered), Some(&pixelate(&gradient(20, 20), 10)));
    }

    #[test]
    fn test_empty_source_gives_no_pattern() {
        let mut patterns = PixelatePatterns::new(RgbaImage::new(0, 0), 10);
        assert_eq!(patterns.create_pattern(&[]), None);
    }
}
