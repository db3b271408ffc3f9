//! Scratch memory for rendering glyphs.

use glyph_raster::{AlphaImage, Rasterizer};
use glyph_types::PathCommand;

/// Reusable buffers for rendering glyphs.
///
/// The outline, accumulation and mask buffers grow as larger glyphs are
/// rendered and are never shrunk, so rendering a run of similarly sized
/// glyphs allocates only for the first few. Use one context per thread.
#[derive(Default)]
pub struct RasterContext {
    pub(crate) outline: Vec<PathCommand>,
    pub(crate) raster: Rasterizer,
    pub(crate) mask: AlphaImage,
}

impl RasterContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rasterizer used for glyphs.
    pub fn rasterizer(&self) -> &Rasterizer {
        &self.raster
    }

    /// Returns the rasterizer for changing its settings, such as the
    /// precision or kernel backend.
    pub fn rasterizer_mut(&mut self) -> &mut Rasterizer {
        &mut self.raster
    }

    /// Returns the mask of the most recently rendered glyph.
    pub fn mask(&self) -> &AlphaImage {
        &self.mask
    }

    /// Number of path commands the outline buffer holds without
    /// reallocating.
    pub fn outline_capacity(&self) -> usize {
        self.outline.capacity()
    }

    /// Number of pixels the mask holds without reallocating.
    pub fn mask_capacity(&self) -> usize {
        self.mask.capacity()
    }

    /// Releases all scratch memory.
    ///
    /// The context stays usable and allocates again on the next glyph.
    /// Closing more than once has no further effect.
    pub fn close(&mut self) {
        self.outline = Vec::new();
        self.raster.release();
        self.mask.release();
    }
}
