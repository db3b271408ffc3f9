//! Rendering faces for glyph outlines.
//!
//! A [`Face`] renders single characters into coverage masks positioned in
//! destination pixel space. [`OutlineFace`] implements it over any
//! [`FontSource`], which supplies glyph outlines and metrics in 26.6 pixel
//! units. All scratch memory lives in a caller owned [`RasterContext`] so a
//! face can be shared between renders without reallocating.
//!
//! With the `sfnt` feature, `SfntSource` reads OpenType and TrueType fonts.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod backend;
mod context;
mod drawer;
mod face;
mod metrics;
mod options;
mod source;

#[cfg(test)]
mod testing;

#[cfg(feature = "sfnt")]
pub use backend::sfnt::SfntSource;
pub use context::RasterContext;
pub use drawer::{bound_str, measure_str, Drawer};
pub use face::{Face, GlyphImage, OutlineFace};
pub use metrics::Metrics;
pub use options::{FaceError, FaceOptions, Hinting};
pub use source::{outline_bounds, DecodeError, FontSource};

pub use glyph_types::{F26Dot6, GlyphId, PathCommand, Point, Rect};
