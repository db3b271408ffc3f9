//! Errors reported by the rasterizer.

use thiserror::Error;

/// Largest number of pixels a rasterizer will allocate for.
pub const MAX_AREA: u64 = 1 << 26;

/// Errors that may occur when preparing a rasterizer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RasterError {
    /// The requested size was negative or larger than [`MAX_AREA`] pixels.
    #[error("invalid raster size {width}x{height}")]
    InvalidSize { width: i32, height: i32 },
}
