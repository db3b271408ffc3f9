//! Drawing and measuring strings.

use glyph_raster::{draw_mask, Canvas, Color, Op};
use glyph_types::{F26Dot6, Point, Rect};

use crate::{Face, RasterContext};

/// Draws text onto a canvas.
///
/// Each glyph is rendered at the dot, composited with [`Op::Over`] and the
/// dot is moved past it. Kerning is applied between consecutive glyphs.
/// Characters the face cannot render are skipped.
pub struct Drawer<'a, F: Face + ?Sized, C: Canvas + ?Sized> {
    pub dst: &'a mut C,
    pub face: &'a F,
    pub cx: &'a mut RasterContext,
    pub paint: Color,
    /// Baseline position of the next glyph.
    pub dot: Point<F26Dot6>,
}

impl<'a, F: Face + ?Sized, C: Canvas + ?Sized> Drawer<'a, F, C> {
    pub fn new(
        dst: &'a mut C,
        face: &'a F,
        cx: &'a mut RasterContext,
        paint: Color,
        dot: Point<F26Dot6>,
    ) -> Self {
        Self {
            dst,
            face,
            cx,
            paint,
            dot,
        }
    }

    /// Draws `text` and advances the dot past it.
    pub fn draw_str(&mut self, text: &str) {
        let mut prev = None;
        for ch in text.chars() {
            if let Some(prev) = prev {
                self.dot.x = self.dot.x.wrapping_add(self.face.kern(prev, ch));
            }
            let Some(glyph) = self.face.glyph(self.cx, self.dot, ch) else {
                continue;
            };
            draw_mask(
                self.dst,
                glyph.dest,
                glyph.mask,
                glyph.mask_origin,
                self.paint,
                Op::Over,
            );
            self.dot.x = self.dot.x.wrapping_add(glyph.advance);
            prev = Some(ch);
        }
    }

    /// Returns the distance the dot would move when drawing `text`.
    pub fn measure_str(&self, text: &str) -> F26Dot6 {
        measure_str(self.face, text)
    }

    /// Returns the bounds of `text` if drawn at the current dot, and its
    /// advance.
    pub fn bound_str(&self, text: &str) -> (Rect, F26Dot6) {
        let (bounds, advance) = bound_str(self.face, text);
        (bounds.translate(self.dot), advance)
    }
}

/// Returns the total advance of `text`, kerning included.
pub fn measure_str<F: Face + ?Sized>(face: &F, text: &str) -> F26Dot6 {
    let mut advance = F26Dot6::ZERO;
    let mut prev = None;
    for ch in text.chars() {
        if let Some(prev) = prev {
            advance = advance.wrapping_add(face.kern(prev, ch));
        }
        let Some(a) = face.glyph_advance(ch) else {
            continue;
        };
        advance = advance.wrapping_add(a);
        prev = Some(ch);
    }
    advance
}

/// Returns the ink bounds of `text` drawn with its dot at the origin, and
/// its total advance.
///
/// Whitespace moves the dot without adding to the bounds.
pub fn bound_str<F: Face + ?Sized>(face: &F, text: &str) -> (Rect, F26Dot6) {
    let mut bounds = Rect::default();
    let mut x = F26Dot6::ZERO;
    let mut prev = None;
    for ch in text.chars() {
        if let Some(prev) = prev {
            x = x.wrapping_add(face.kern(prev, ch));
        }
        let Some((b, advance)) = face.glyph_bounds(ch) else {
            continue;
        };
        bounds = bounds.union(&b.translate(Point::new(x, F26Dot6::ZERO)));
        x = x.wrapping_add(advance);
        prev = Some(ch);
    }
    (bounds, x)
}
