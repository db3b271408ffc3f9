//! Anti-aliased rasterization of glyph outlines.
//!
//! A [`Rasterizer`] accumulates the signed area of path segments into a
//! grid of cells, one per pixel, and then converts the accumulated area to
//! alpha coverage while compositing it onto a [`Canvas`].
//!
//! ```
//! use glyph_raster::{AlphaImage, Color, IntRect, Op, Rasterizer};
//!
//! let mut raster = Rasterizer::with_size(4, 4).unwrap();
//! raster.move_to(1.0, 1.0);
//! raster.line_to(3.0, 1.0);
//! raster.line_to(3.0, 3.0);
//! raster.line_to(1.0, 3.0);
//! raster.close_path();
//!
//! let mut mask = AlphaImage::new(IntRect::from_size(4, 4));
//! raster.set_op(Op::Src);
//! raster.draw(&mut mask, IntRect::from_size(4, 4), Color::OPAQUE);
//! assert_eq!(mask.alpha_at(1, 1), 0xff);
//! assert_eq!(mask.alpha_at(0, 0), 0);
//! ```
//!
//! Small rasters accumulate with fixed point arithmetic and large ones with
//! floating point arithmetic; see [`Precision`].

#![forbid(unsafe_code)]

mod buffer;
mod error;
mod fixed;
mod flatten;
mod floating;
mod image;
pub mod kernel;
mod rasterizer;

pub use error::{RasterError, MAX_AREA};
pub use flatten::{FLATTEN_TOLERANCE, MAX_SEGMENTS};
pub use glyph_types::{IntRect, Point};
pub use image::{draw_mask, AlphaImage, Canvas, Color, Coverage, Op, RgbaImage};
pub use kernel::{Backend, FillRule};
pub use rasterizer::{Precision, Rasterizer, FLOATING_POINT_THRESHOLD};
