//! Rendering glyphs from a font source.

use core::cell::OnceCell;

use glyph_raster::{AlphaImage, Color, IntRect, Op};
use glyph_types::{F26Dot6, GlyphId, Point, Rect};

use crate::{DecodeError, FaceError, FaceOptions, FontSource, Hinting, Metrics, RasterContext};

/// Coverage mask of a single rendered glyph.
#[derive(Clone, Debug)]
pub struct GlyphImage<'a> {
    /// Destination pixels covered by the mask.
    pub dest: IntRect,
    /// Coverage of the glyph. Borrowed from the [`RasterContext`] it was
    /// rendered with and overwritten by the next glyph.
    pub mask: &'a AlphaImage,
    /// Point of the mask aligned with the top-left corner of `dest`.
    pub mask_origin: Point<i32>,
    /// Distance to move the dot to the next glyph.
    pub advance: F26Dot6,
}

impl GlyphImage<'_> {
    /// Returns true if the glyph has no ink, as for whitespace.
    pub fn is_empty(&self) -> bool {
        self.dest.is_empty()
    }
}

/// Source of rendered glyphs at a fixed size.
///
/// Failures are not reported beyond their absence: lookups for characters
/// the face cannot render return `None` or zero.
pub trait Face {
    /// Returns the font wide metrics.
    fn metrics(&self) -> Metrics;

    /// Returns the horizontal adjustment for the kerning pair (a, b).
    ///
    /// A positive kern means to move the glyphs further apart.
    fn kern(&self, a: char, b: char) -> F26Dot6;

    /// Returns the ink bounds of `ch` relative to its dot, and its advance.
    fn glyph_bounds(&self, ch: char) -> Option<(Rect, F26Dot6)>;

    /// Returns the advance width of `ch`.
    fn glyph_advance(&self, ch: char) -> Option<F26Dot6>;

    /// Renders `ch` with its origin at the sub-pixel position `dot`.
    ///
    /// The mask is rendered into the scratch memory of `cx`. Whitespace
    /// renders to an empty mask; a glyph that cannot be rendered yields
    /// `None` and never a partial mask.
    fn glyph<'a>(
        &self,
        cx: &'a mut RasterContext,
        dot: Point<F26Dot6>,
        ch: char,
    ) -> Option<GlyphImage<'a>>;
}

/// A [`Face`] that renders the outlines of a [`FontSource`].
pub struct OutlineFace<S> {
    source: S,
    scale: F26Dot6,
    hinting: Hinting,
    metrics: OnceCell<Metrics>,
}

impl<S: FontSource> OutlineFace<S> {
    /// Creates a face for `source` at the size and resolution in `options`.
    pub fn new(source: S, options: &FaceOptions) -> Result<Self, FaceError> {
        Ok(Self {
            source,
            scale: options.scale()?,
            hinting: options.hinting,
            metrics: OnceCell::new(),
        })
    }

    /// Returns the number of 26.6 pixels per em.
    pub fn scale(&self) -> F26Dot6 {
        self.scale
    }

    pub fn hinting(&self) -> Hinting {
        self.hinting
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    fn index(&self, ch: char) -> Option<GlyphId> {
        self.source
            .glyph_index(ch)
            .map_err(|e| log::debug!("no glyph for {ch:?}: {e}"))
            .ok()
    }

    fn render<'a>(
        &self,
        cx: &'a mut RasterContext,
        dot: Point<F26Dot6>,
        gid: GlyphId,
    ) -> Result<GlyphImage<'a>, DecodeError> {
        cx.outline.clear();
        self.source
            .load_outline(gid, self.scale, self.hinting, &mut cx.outline)?;
        let (bounds, advance) = self.source.glyph_bounds(gid, self.scale, self.hinting)?;
        let pixels = bounds.pixel_bounds();
        let (width, height) = (pixels.width(), pixels.height());
        log::trace!("glyph {gid}: {width}x{height} pixels");
        cx.raster
            .reset(width, height)
            .map_err(|_| DecodeError::MalformedOutline(gid))?;
        cx.raster.set_op(Op::Src);
        let min = pixels.min();
        let origin = Point::new(-min.x as f32, -min.y as f32);
        for command in &cx.outline {
            command.apply(origin, &mut cx.raster);
        }
        cx.mask.reset(width, height);
        let area = IntRect::from_size(width, height);
        cx.raster.draw(&mut cx.mask, area, Color::OPAQUE);
        Ok(GlyphImage {
            dest: area.translate(dot.floor() + min),
            mask: &cx.mask,
            mask_origin: Point::default(),
            advance,
        })
    }
}

impl<S: FontSource> Face for OutlineFace<S> {
    fn metrics(&self) -> Metrics {
        *self.metrics.get_or_init(|| {
            self.source
                .metrics(self.scale, self.hinting)
                .unwrap_or_else(|e| {
                    log::debug!("no metrics: {e}");
                    Metrics::default()
                })
        })
    }

    fn kern(&self, a: char, b: char) -> F26Dot6 {
        let (Some(ga), Some(gb)) = (self.index(a), self.index(b)) else {
            return F26Dot6::ZERO;
        };
        match self.source.kern(ga, gb, self.scale, self.hinting) {
            Ok(kern) => kern,
            Err(DecodeError::KerningUnavailable) => F26Dot6::ZERO,
            Err(e) => {
                log::debug!("no kerning for {a:?} {b:?}: {e}");
                F26Dot6::ZERO
            }
        }
    }

    fn glyph_bounds(&self, ch: char) -> Option<(Rect, F26Dot6)> {
        let gid = self.index(ch)?;
        self.source
            .glyph_bounds(gid, self.scale, self.hinting)
            .map_err(|e| log::debug!("no bounds for {ch:?}: {e}"))
            .ok()
    }

    fn glyph_advance(&self, ch: char) -> Option<F26Dot6> {
        let gid = self.index(ch)?;
        self.source
            .glyph_advance(gid, self.scale, self.hinting)
            .map_err(|e| log::debug!("no advance for {ch:?}: {e}"))
            .ok()
    }

    fn glyph<'a>(
        &self,
        cx: &'a mut RasterContext,
        dot: Point<F26Dot6>,
        ch: char,
    ) -> Option<GlyphImage<'a>> {
        let gid = self.index(ch)?;
        self.render(cx, dot, gid)
            .map_err(|e| log::debug!("cannot render {ch:?}: {e}"))
            .ok()
    }
}
