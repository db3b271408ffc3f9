//! The interface to font decoders.

use glyph_types::{F26Dot6, GlyphId, PathCommand, Point, Rect};
use thiserror::Error;

use crate::{Hinting, Metrics};

/// Errors reported by a [`FontSource`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("no glyph for character {0:?}")]
    UnmappedChar(char),

    #[error("glyph {0} not found")]
    GlyphNotFound(GlyphId),

    #[error("malformed outline for glyph {0}")]
    MalformedOutline(GlyphId),

    #[error("no kerning data")]
    KerningUnavailable,

    #[error("hinting instance could not be created")]
    HintingFailed,

    #[error("Error reading font data: {0}")]
    Read(String),
}

/// Decoded font data at a given scale.
///
/// The scale is the number of 26.6 pixels per em. All returned coordinates
/// are 26.6 pixels in a y-down coordinate system with the glyph origin at
/// (0, 0).
pub trait FontSource {
    /// Maps a character to a glyph.
    fn glyph_index(&self, ch: char) -> Result<GlyphId, DecodeError>;

    /// Appends the outline of `gid` to `outline`.
    ///
    /// Every contour starts with a [`PathCommand::MoveTo`] and ends back at
    /// that point. On error the contents of `outline` are unspecified.
    fn load_outline(
        &self,
        gid: GlyphId,
        scale: F26Dot6,
        hinting: Hinting,
        outline: &mut Vec<PathCommand>,
    ) -> Result<(), DecodeError>;

    /// Returns the ink bounds and the advance of `gid`.
    fn glyph_bounds(
        &self,
        gid: GlyphId,
        scale: F26Dot6,
        hinting: Hinting,
    ) -> Result<(Rect, F26Dot6), DecodeError>;

    /// Returns the advance width of `gid`.
    fn glyph_advance(
        &self,
        gid: GlyphId,
        scale: F26Dot6,
        hinting: Hinting,
    ) -> Result<F26Dot6, DecodeError>;

    /// Returns the horizontal adjustment between the glyphs `a` and `b`.
    fn kern(
        &self,
        a: GlyphId,
        b: GlyphId,
        scale: F26Dot6,
        hinting: Hinting,
    ) -> Result<F26Dot6, DecodeError>;

    /// Returns the font wide metrics.
    fn metrics(&self, scale: F26Dot6, hinting: Hinting) -> Result<Metrics, DecodeError>;
}

/// Returns the smallest rectangle containing every point of `outline`,
/// control points included.
///
/// An empty outline has empty bounds at the origin.
pub fn outline_bounds(outline: &[PathCommand]) -> Rect {
    let mut points = outline.iter().flat_map(|command| {
        let (a, b, c) = match *command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => (p, p, p),
            PathCommand::QuadTo(c0, p) => (c0, p, p),
            PathCommand::CubicTo(c0, c1, p) => (c0, c1, p),
        };
        [a, b, c]
    });
    let Some(first) = points.next() else {
        return Rect::default();
    };
    points.fold(Rect::new(first, first), |r, p| {
        Rect::new(
            Point::new(r.min.x.min(p.x), r.min.y.min(p.y)),
            Point::new(r.max.x.max(p.x), r.max.y.max(p.y)),
        )
    })
}
