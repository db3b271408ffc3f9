//! Scalar and geometric types shared by the glyph rasterizer and faces.
//!
//! Everything that lives in glyph space is expressed with the 26.6 fixed
//! point [`F26Dot6`] type: outline coordinates, advances and kerning
//! adjustments. Pixel space rectangles use [`IntRect`].

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod fixed;
mod glyph_id;
mod pen;
mod point;
mod rect;

pub use fixed::F26Dot6;
pub use glyph_id::GlyphId;
pub use pen::{OutlinePen, PathCommand};
pub use point::Point;
pub use rect::{IntRect, Rect};
