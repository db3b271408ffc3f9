//! In-memory font for exercising faces without font files.

use core::cell::Cell;

use glyph_types::{F26Dot6, GlyphId, PathCommand, Point, Rect};

use crate::{outline_bounds, DecodeError, FontSource, Hinting, Metrics};

const UNITS_PER_EM: f64 = 1000.0;

/// Outline segment in font units with y pointing up.
#[derive(Copy, Clone)]
enum Segment {
    Move(i32, i32),
    Line(i32, i32),
    Quad(i32, i32, i32, i32),
    Cubic(i32, i32, i32, i32, i32, i32),
}

use Segment::*;

struct Glyph {
    ch: char,
    advance: i32,
    outline: &'static [Segment],
    corrupt: bool,
}

const RING: &[Segment] = &[
    // outer, counterclockwise
    Move(550, 350),
    Quad(550, 600, 300, 600),
    Quad(50, 600, 50, 350),
    Quad(50, 100, 300, 100),
    Quad(550, 100, 550, 350),
    // inner, clockwise
    Move(450, 350),
    Quad(450, 200, 300, 200),
    Quad(150, 200, 150, 350),
    Quad(150, 500, 300, 500),
    Quad(450, 500, 450, 350),
];

const GLYPHS: &[Glyph] = &[
    Glyph {
        ch: ' ',
        advance: 250,
        outline: &[],
        corrupt: false,
    },
    Glyph {
        ch: 'I',
        advance: 400,
        outline: &[
            Move(100, 0),
            Line(300, 0),
            Line(300, 700),
            Line(100, 700),
            Line(100, 0),
        ],
        corrupt: false,
    },
    Glyph {
        ch: 'O',
        advance: 600,
        outline: RING,
        corrupt: false,
    },
    Glyph {
        ch: 'D',
        advance: 600,
        outline: &[
            Move(100, 0),
            Line(300, 0),
            Cubic(500, 0, 500, 700, 300, 700),
            Line(100, 700),
            Line(100, 0),
        ],
        corrupt: false,
    },
    Glyph {
        ch: '!',
        advance: 300,
        outline: &[Move(100, 0), Line(200, 700)],
        corrupt: true,
    },
    Glyph {
        ch: 'A',
        advance: 600,
        outline: &[Move(0, 0), Line(300, 700), Line(600, 0), Line(0, 0)],
        corrupt: false,
    },
    Glyph {
        ch: 'V',
        advance: 600,
        outline: &[Move(0, 700), Line(600, 700), Line(300, 0), Line(0, 700)],
        corrupt: false,
    },
];

const KERNING: &[(char, char, i32)] = &[('A', 'V', -80)];

/// Font with a handful of hand built glyphs, 1000 units per em.
///
/// Glyph ids are one more than the position in the glyph table, leaving id
/// zero unused. Characters without a glyph fail to map.
pub(crate) struct SyntheticFont {
    metrics_calls: Cell<usize>,
    metrics_available: bool,
}

impl SyntheticFont {
    pub(crate) fn new() -> Self {
        Self {
            metrics_calls: Cell::new(0),
            metrics_available: true,
        }
    }

    /// Makes every metrics request fail.
    pub(crate) fn without_metrics(mut self) -> Self {
        self.metrics_available = false;
        self
    }

    pub(crate) fn metrics_calls(&self) -> usize {
        self.metrics_calls.get()
    }

    fn glyph(&self, gid: GlyphId) -> Result<&'static Glyph, DecodeError> {
        (gid.to_u32() as usize)
            .checked_sub(1)
            .and_then(|i| GLYPHS.get(i))
            .ok_or(DecodeError::GlyphNotFound(gid))
    }
}

fn scale_units(units: i32, scale: F26Dot6) -> F26Dot6 {
    F26Dot6::from_f64(units as f64 * scale.to_f64() / UNITS_PER_EM)
}

fn fit(v: F26Dot6, snap: bool) -> F26Dot6 {
    if snap {
        F26Dot6::from_i32(v.round())
    } else {
        v
    }
}

fn point(x: i32, y: i32, scale: F26Dot6, hinting: Hinting) -> Point<F26Dot6> {
    Point::new(
        fit(scale_units(x, scale), hinting == Hinting::Full),
        fit(-scale_units(y, scale), hinting != Hinting::None),
    )
}

impl FontSource for SyntheticFont {
    fn glyph_index(&self, ch: char) -> Result<GlyphId, DecodeError> {
        GLYPHS
            .iter()
            .position(|g| g.ch == ch)
            .map(|i| GlyphId::new(i as u32 + 1))
            .ok_or(DecodeError::UnmappedChar(ch))
    }

    fn load_outline(
        &self,
        gid: GlyphId,
        scale: F26Dot6,
        hinting: Hinting,
        outline: &mut Vec<PathCommand>,
    ) -> Result<(), DecodeError> {
        let glyph = self.glyph(gid)?;
        let p = |x, y| point(x, y, scale, hinting);
        for segment in glyph.outline {
            outline.push(match *segment {
                Move(x, y) => PathCommand::MoveTo(p(x, y)),
                Line(x, y) => PathCommand::LineTo(p(x, y)),
                Quad(cx, cy, x, y) => PathCommand::QuadTo(p(cx, cy), p(x, y)),
                Cubic(cx0, cy0, cx1, cy1, x, y) => {
                    PathCommand::CubicTo(p(cx0, cy0), p(cx1, cy1), p(x, y))
                }
            });
        }
        if glyph.corrupt {
            return Err(DecodeError::MalformedOutline(gid));
        }
        Ok(())
    }

    fn glyph_bounds(
        &self,
        gid: GlyphId,
        scale: F26Dot6,
        hinting: Hinting,
    ) -> Result<(Rect, F26Dot6), DecodeError> {
        let mut outline = Vec::new();
        self.load_outline(gid, scale, hinting, &mut outline)?;
        let advance = self.glyph_advance(gid, scale, hinting)?;
        Ok((outline_bounds(&outline), advance))
    }

    fn glyph_advance(
        &self,
        gid: GlyphId,
        scale: F26Dot6,
        hinting: Hinting,
    ) -> Result<F26Dot6, DecodeError> {
        let glyph = self.glyph(gid)?;
        Ok(fit(scale_units(glyph.advance, scale), hinting != Hinting::None))
    }

    fn kern(
        &self,
        a: GlyphId,
        b: GlyphId,
        scale: F26Dot6,
        _hinting: Hinting,
    ) -> Result<F26Dot6, DecodeError> {
        let (a, b) = (self.glyph(a)?.ch, self.glyph(b)?.ch);
        KERNING
            .iter()
            .find(|(l, r, _)| *l == a && *r == b)
            .map(|(_, _, units)| scale_units(*units, scale))
            .ok_or(DecodeError::KerningUnavailable)
    }

    fn metrics(&self, scale: F26Dot6, hinting: Hinting) -> Result<Metrics, DecodeError> {
        self.metrics_calls.set(self.metrics_calls.get() + 1);
        if !self.metrics_available {
            return Err(DecodeError::Read("metrics unavailable".into()));
        }
        let v = |units| fit(scale_units(units, scale), hinting != Hinting::None);
        Ok(Metrics {
            height: v(1000),
            ascent: v(800),
            descent: v(200),
            x_height: v(500),
            cap_height: v(700),
            caret_slope: Point::new(0, 1),
        })
    }
}
