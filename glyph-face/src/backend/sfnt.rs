//! OpenType and TrueType fonts through skrifa.

use core::cell::RefCell;

use glyph_types::{F26Dot6, GlyphId, PathCommand, Point, Rect};
use skrifa::{
    instance::{LocationRef, Size},
    outline::{
        DrawSettings, Engine, HintingInstance, HintingOptions, OutlineGlyphCollection,
        OutlinePen, SmoothMode, Target,
    },
    raw::TableProvider,
    FontRef, MetadataProvider,
};

use crate::{outline_bounds, DecodeError, FontSource, Hinting, Metrics};

/// A [`FontSource`] for the default instance of an OpenType font.
///
/// Characters missing from the character map render as the `.notdef`
/// glyph. Kerning tables are not read.
pub struct SfntSource<'a> {
    font: FontRef<'a>,
    outlines: OutlineGlyphCollection<'a>,
    hinter: RefCell<Option<CachedHinter>>,
    // bounds of the outline drawn last, keyed by glyph and instance
    bounds: RefCell<Option<(GlyphKey, Rect)>>,
    scratch: RefCell<Vec<PathCommand>>,
}

struct CachedHinter {
    scale: F26Dot6,
    hinting: Hinting,
    instance: HintingInstance,
}

type GlyphKey = (GlyphId, F26Dot6, Hinting);

impl<'a> SfntSource<'a> {
    /// Reads the font in `data`, or the first font of a collection.
    pub fn new(data: &'a [u8]) -> Result<Self, DecodeError> {
        Self::from_index(data, 0)
    }

    /// Reads the font at `index` of a font collection.
    pub fn from_index(data: &'a [u8], index: u32) -> Result<Self, DecodeError> {
        let font = FontRef::from_index(data, index).map_err(|e| DecodeError::Read(e.to_string()))?;
        Ok(Self::from_font(font))
    }

    pub fn from_font(font: FontRef<'a>) -> Self {
        Self {
            outlines: font.outline_glyphs(),
            font,
            hinter: RefCell::new(None),
            bounds: RefCell::new(None),
            scratch: RefCell::new(Vec::new()),
        }
    }

    pub fn font(&self) -> &FontRef<'a> {
        &self.font
    }

    fn draw(
        &self,
        gid: GlyphId,
        scale: F26Dot6,
        hinting: Hinting,
        outline: &mut Vec<PathCommand>,
    ) -> Result<(), DecodeError> {
        let glyph = self
            .outlines
            .get(skrifa::GlyphId::new(gid.to_u32()))
            .ok_or(DecodeError::GlyphNotFound(gid))?;
        let mut pen = CommandPen::new(outline);
        let result = match hinting_options(hinting) {
            None => glyph.draw(
                DrawSettings::unhinted(size(scale), LocationRef::default()),
                &mut pen,
            ),
            Some(options) => {
                let mut cache = self.hinter.borrow_mut();
                let stale = !matches!(
                    &*cache,
                    Some(cached) if cached.scale == scale && cached.hinting == hinting
                );
                if stale {
                    let instance = HintingInstance::new(
                        &self.outlines,
                        size(scale),
                        LocationRef::default(),
                        options,
                    )
                    .map_err(|e| {
                        log::debug!("hinting at {scale} failed: {e}");
                        DecodeError::HintingFailed
                    })?;
                    *cache = Some(CachedHinter {
                        scale,
                        hinting,
                        instance,
                    });
                }
                let Some(cached) = cache.as_ref() else {
                    return Err(DecodeError::HintingFailed);
                };
                glyph.draw(&cached.instance, &mut pen)
            }
        };
        result.map_err(|e| {
            log::debug!("glyph {gid}: {e}");
            DecodeError::MalformedOutline(gid)
        })?;
        pen.finish();
        Ok(())
    }
}

fn size(scale: F26Dot6) -> Size {
    Size::new(scale.to_f32())
}

fn hinting_options(hinting: Hinting) -> Option<HintingOptions> {
    let mode = match hinting {
        Hinting::None => return None,
        Hinting::Vertical => SmoothMode::Light,
        Hinting::Full => SmoothMode::Normal,
    };
    Some(HintingOptions {
        engine: Engine::AutoFallback,
        target: Target::Smooth {
            mode,
            symmetric_rendering: false,
            preserve_linear_metrics: true,
        },
    })
}

fn fixed(v: f32, hinting: Hinting) -> F26Dot6 {
    let v = F26Dot6::from_f32(v);
    match hinting {
        Hinting::None => v,
        _ => F26Dot6::from_i32(v.round()),
    }
}

/// Records outlines as y-down path commands with explicitly closed contours.
struct CommandPen<'a> {
    commands: &'a mut Vec<PathCommand>,
    start: Option<Point<F26Dot6>>,
    current: Point<F26Dot6>,
}

impl<'a> CommandPen<'a> {
    fn new(commands: &'a mut Vec<PathCommand>) -> Self {
        Self {
            commands,
            start: None,
            current: Point::default(),
        }
    }

    fn point(x: f32, y: f32) -> Point<F26Dot6> {
        Point::new(F26Dot6::from_f32(x), F26Dot6::from_f32(-y))
    }

    fn push(&mut self, command: PathCommand) {
        self.current = command.end_point();
        self.commands.push(command);
    }

    fn finish(&mut self) {
        if let Some(start) = self.start.take() {
            if self.current != start {
                self.push(PathCommand::LineTo(start));
            }
        }
    }
}

impl OutlinePen for CommandPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.finish();
        let p = Self::point(x, y);
        self.start = Some(p);
        self.push(PathCommand::MoveTo(p));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(PathCommand::LineTo(Self::point(x, y)));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.push(PathCommand::QuadTo(
            Self::point(cx0, cy0),
            Self::point(x, y),
        ));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.push(PathCommand::CubicTo(
            Self::point(cx0, cy0),
            Self::point(cx1, cy1),
            Self::point(x, y),
        ));
    }

    fn close(&mut self) {
        self.finish();
    }
}

impl FontSource for SfntSource<'_> {
    fn glyph_index(&self, ch: char) -> Result<GlyphId, DecodeError> {
        Ok(self
            .font
            .charmap()
            .map(ch)
            .map(|gid| GlyphId::new(gid.to_u32()))
            .unwrap_or(GlyphId::NOTDEF))
    }

    fn load_outline(
        &self,
        gid: GlyphId,
        scale: F26Dot6,
        hinting: Hinting,
        outline: &mut Vec<PathCommand>,
    ) -> Result<(), DecodeError> {
        let start = outline.len();
        self.draw(gid, scale, hinting, outline)?;
        let bounds = outline_bounds(&outline[start..]);
        *self.bounds.borrow_mut() = Some(((gid, scale, hinting), bounds));
        Ok(())
    }

    fn glyph_bounds(
        &self,
        gid: GlyphId,
        scale: F26Dot6,
        hinting: Hinting,
    ) -> Result<(Rect, F26Dot6), DecodeError> {
        let advance = self.glyph_advance(gid, scale, hinting)?;
        let key = (gid, scale, hinting);
        if let Some((cached, bounds)) = *self.bounds.borrow() {
            if cached == key {
                return Ok((bounds, advance));
            }
        }
        let mut scratch = self.scratch.borrow_mut();
        scratch.clear();
        self.draw(gid, scale, hinting, &mut scratch)?;
        let bounds = outline_bounds(&scratch);
        *self.bounds.borrow_mut() = Some((key, bounds));
        Ok((bounds, advance))
    }

    fn glyph_advance(
        &self,
        gid: GlyphId,
        scale: F26Dot6,
        hinting: Hinting,
    ) -> Result<F26Dot6, DecodeError> {
        self.font
            .glyph_metrics(size(scale), LocationRef::default())
            .advance_width(skrifa::GlyphId::new(gid.to_u32()))
            .map(|advance| fixed(advance, hinting))
            .ok_or(DecodeError::GlyphNotFound(gid))
    }

    fn kern(
        &self,
        _a: GlyphId,
        _b: GlyphId,
        _scale: F26Dot6,
        _hinting: Hinting,
    ) -> Result<F26Dot6, DecodeError> {
        Err(DecodeError::KerningUnavailable)
    }

    fn metrics(&self, scale: F26Dot6, hinting: Hinting) -> Result<Metrics, DecodeError> {
        let m = self.font.metrics(size(scale), LocationRef::default());
        let hhea = self
            .font
            .hhea()
            .map_err(|e| DecodeError::Read(e.to_string()))?;
        Ok(Metrics {
            height: fixed(m.ascent - m.descent + m.leading, hinting),
            ascent: fixed(m.ascent, hinting),
            descent: fixed(-m.descent, hinting),
            x_height: fixed(m.x_height.unwrap_or_default(), hinting),
            cap_height: fixed(m.cap_height.unwrap_or_default(), hinting),
            caret_slope: Point::new(
                hhea.caret_slope_run() as i32,
                hhea.caret_slope_rise() as i32,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn px(v: i32) -> F26Dot6 {
        F26Dot6::from_i32(v)
    }

    #[test]
    fn pen_flips_and_closes_contours() {
        let mut commands = Vec::new();
        let mut pen = CommandPen::new(&mut commands);
        pen.move_to(0.0, 0.0);
        pen.line_to(2.0, 0.0);
        pen.line_to(2.0, 3.0);
        pen.close();
        // already closed, nothing is added
        pen.move_to(5.0, 0.0);
        pen.quad_to(6.0, 1.0, 5.0, 0.0);
        // left open
        pen.move_to(8.0, 0.0);
        pen.line_to(9.0, 1.0);
        pen.finish();
        let p = |x, y| Point::new(px(x), px(y));
        assert_eq!(
            commands,
            [
                PathCommand::MoveTo(p(0, 0)),
                PathCommand::LineTo(p(2, 0)),
                PathCommand::LineTo(p(2, -3)),
                PathCommand::LineTo(p(0, 0)),
                PathCommand::MoveTo(p(5, 0)),
                PathCommand::QuadTo(p(6, -1), p(5, 0)),
                PathCommand::MoveTo(p(8, 0)),
                PathCommand::LineTo(p(9, -1)),
                PathCommand::LineTo(p(8, 0)),
            ]
        );
    }

    #[test]
    fn hinting_modes_map_to_targets() {
        assert!(hinting_options(Hinting::None).is_none());
        assert!(matches!(
            hinting_options(Hinting::Vertical).map(|o| o.target),
            Some(Target::Smooth {
                mode: SmoothMode::Light,
                ..
            })
        ));
        assert!(matches!(
            hinting_options(Hinting::Full).map(|o| o.target),
            Some(Target::Smooth {
                mode: SmoothMode::Normal,
                ..
            })
        ));
    }

    #[test]
    fn garbage_is_not_a_font() {
        assert!(matches!(
            SfntSource::new(b"definitely not a font"),
            Err(DecodeError::Read(_))
        ));
        assert!(matches!(SfntSource::new(&[]), Err(DecodeError::Read(_))));
    }

    mod vazirmatn {
        use super::*;
        use crate::{Face, FaceOptions, OutlineFace, RasterContext};
        use pretty_assertions::assert_eq;
        use font_test_data::VAZIRMATN_VAR;

        // 2048 units per em, 'A' maps to glyph 1 with an advance of 1336
        const A: GlyphId = GlyphId::new(1);

        fn face(hinting: Hinting) -> OutlineFace<SfntSource<'static>> {
            let options = FaceOptions {
                size: 16.0,
                hinting,
                ..Default::default()
            };
            OutlineFace::new(SfntSource::new(VAZIRMATN_VAR).unwrap(), &options).unwrap()
        }

        fn near(a: F26Dot6, b: F26Dot6) -> bool {
            (a.to_bits() - b.to_bits()).abs() <= 1
        }

        #[test]
        fn maps_characters() {
            let source = SfntSource::new(VAZIRMATN_VAR).unwrap();
            assert_eq!(source.glyph_index('A'), Ok(A));
            assert_eq!(source.glyph_index('`'), Ok(GlyphId::new(3)));
            assert_eq!(source.glyph_index('B'), Ok(GlyphId::NOTDEF));
        }

        #[test]
        fn renders_unhinted_glyph() {
            let face = face(Hinting::None);
            let mut cx = RasterContext::new();
            let dot = Point::new(F26Dot6::from_i32(2), F26Dot6::from_i32(20));
            let glyph = face.glyph(&mut cx, dot, 'A').unwrap();
            // 1336 * 16 / 2048 pixels
            assert!(near(glyph.advance, F26Dot6::from_bits(668)), "{}", glyph.advance);
            assert!(!glyph.is_empty());
            assert!(glyph.mask.pixels().iter().any(|a| *a == 0xff));
            // y is flipped so the glyph sits above the baseline
            assert!(glyph.dest.y1 >= 20 && glyph.dest.y1 <= 21, "{:?}", glyph.dest);
            assert!(glyph.dest.y0 <= 12, "{:?}", glyph.dest);
            assert!((9..=12).contains(&glyph.dest.width()), "{:?}", glyph.dest);
            let advance = glyph.advance;
            assert_eq!(face.glyph_advance('A'), Some(advance));
        }

        #[test]
        fn unmapped_characters_render_notdef() {
            let face = face(Hinting::None);
            let mut cx = RasterContext::new();
            let glyph = face.glyph(&mut cx, Point::default(), 'B').unwrap();
            // 908 * 16 / 2048 pixels
            assert!(near(glyph.advance, F26Dot6::from_bits(454)), "{}", glyph.advance);
        }

        #[test]
        fn scaled_metrics() {
            let metrics = face(Hinting::None).metrics();
            // ascent 2100 and descent 1100 units
            assert!(near(metrics.ascent, F26Dot6::from_bits(1050)), "{metrics:?}");
            assert!(near(metrics.descent, F26Dot6::from_bits(550)), "{metrics:?}");
            assert!(near(metrics.height, F26Dot6::from_bits(1600)), "{metrics:?}");
        }

        #[test]
        fn hinted_glyphs_land_on_whole_pixels() {
            let face = face(Hinting::Full);
            let mut cx = RasterContext::new();
            for _ in 0..2 {
                let glyph = face.glyph(&mut cx, Point::default(), 'A').unwrap();
                assert_eq!(glyph.advance, F26Dot6::from_i32(10));
                assert!(!glyph.is_empty());
            }
            let metrics = face.metrics();
            assert_eq!(metrics.ascent, F26Dot6::from_i32(16));
            assert_eq!(metrics.descent, F26Dot6::from_i32(9));
            assert!(face.source().hinter.borrow().is_some());
        }

        #[test]
        fn bounds_come_from_the_loaded_outline() {
            let source = SfntSource::new(VAZIRMATN_VAR).unwrap();
            let scale = F26Dot6::from_i32(16);
            let mut outline = vec![PathCommand::MoveTo(Point::default())];
            source
                .load_outline(A, scale, Hinting::None, &mut outline)
                .unwrap();
            let expected = outline_bounds(&outline[1..]);
            assert_eq!(
                *source.bounds.borrow(),
                Some(((A, scale, Hinting::None), expected))
            );
            let (bounds, _) = source.glyph_bounds(A, scale, Hinting::None).unwrap();
            assert_eq!(bounds, expected);

            // another instance misses and refreshes the cache
            let (notdef, _) = source
                .glyph_bounds(GlyphId::NOTDEF, scale, Hinting::None)
                .unwrap();
            assert_ne!(notdef, expected);
            assert_eq!(
                *source.bounds.borrow(),
                Some(((GlyphId::NOTDEF, scale, Hinting::None), notdef))
            );
        }
    }
}
