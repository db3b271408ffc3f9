//! Destination images and compositing.

use bytemuck::{Pod, Zeroable};
use glyph_types::{IntRect, Point};

use crate::{buffer, kernel::div_ffff};

/// Compositing operator.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Hash)]
pub enum Op {
    /// Source is blended over the destination.
    #[default]
    Over,
    /// Source replaces the destination.
    Src,
}

/// Color with premultiplied alpha and 8 bits per channel.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const OPAQUE: Self = Self::new(0xff, 0xff, 0xff, 0xff);

    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns true if the alpha channel is at its maximum.
    pub const fn is_opaque(self) -> bool {
        self.a == 0xff
    }

    /// Channels widened to 16 bits. Color channels are clamped to alpha.
    fn to_rgba16(self) -> [u32; 4] {
        let a = self.a;
        [self.r.min(a), self.g.min(a), self.b.min(a), a].map(|c| c as u32 * 0x101)
    }
}

/// Single channel image with 8 bits of alpha per pixel.
#[derive(Clone, Default, Debug)]
pub struct AlphaImage {
    pix: Vec<u8>,
    stride: usize,
    rect: IntRect,
}

impl AlphaImage {
    /// Creates a transparent image covering `rect`.
    pub fn new(rect: IntRect) -> Self {
        let stride = rect.width() as usize;
        Self {
            pix: vec![0; stride * rect.height() as usize],
            stride,
            rect,
        }
    }

    /// Resizes the image to `width` by `height` pixels at the origin and
    /// clears it, reusing the existing allocation when it is large enough.
    pub fn reset(&mut self, width: i32, height: i32) {
        self.rect = IntRect::from_size(width.max(0), height.max(0));
        self.stride = self.rect.width() as usize;
        buffer::reset_zeroed(&mut self.pix, self.stride * self.rect.height() as usize);
    }

    /// Drops the pixel storage, leaving an empty image.
    pub fn release(&mut self) {
        *self = Self::default();
    }

    pub fn bounds(&self) -> IntRect {
        self.rect
    }

    /// Distance in bytes between vertically adjacent pixels.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of pixels the current allocation can hold.
    pub fn capacity(&self) -> usize {
        self.pix.capacity()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pix
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pix
    }

    /// Returns the alpha at (x, y), or zero outside of the bounds.
    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        self.offset(x, y)
            .and_then(|i| self.pix.get(i).copied())
            .unwrap_or(0)
    }

    /// Sets the alpha at (x, y). Points outside of the bounds are ignored.
    pub fn set_alpha(&mut self, x: i32, y: i32, alpha: u8) {
        if let Some(p) = self.offset(x, y).and_then(|i| self.pix.get_mut(i)) {
            *p = alpha;
        }
    }

    /// Returns the pixels of row `y`, or an empty slice outside of the
    /// bounds.
    pub fn row(&self, y: i32) -> &[u8] {
        self.offset(self.rect.x0, y)
            .and_then(|start| self.pix.get(start..start + self.rect.width() as usize))
            .unwrap_or_default()
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        self.rect.contains(x, y).then(|| {
            (y - self.rect.y0) as usize * self.stride + (x - self.rect.x0) as usize
        })
    }
}

/// Image with four 8-bit premultiplied channels per pixel.
#[derive(Clone, Default, Debug)]
pub struct RgbaImage {
    pix: Vec<Color>,
    stride: usize,
    rect: IntRect,
}

impl RgbaImage {
    /// Creates a transparent image covering `rect`.
    pub fn new(rect: IntRect) -> Self {
        let stride = rect.width() as usize;
        Self {
            pix: vec![Color::TRANSPARENT; stride * rect.height() as usize],
            stride,
            rect,
        }
    }

    pub fn bounds(&self) -> IntRect {
        self.rect
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pix
    }

    /// Returns the pixels as interleaved RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pix)
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: Color) {
        self.pix.fill(color);
    }

    /// Returns the pixel at (x, y), or transparent outside of the bounds.
    pub fn pixel_at(&self, x: i32, y: i32) -> Color {
        self.offset(x, y)
            .and_then(|i| self.pix.get(i).copied())
            .unwrap_or_default()
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        self.rect.contains(x, y).then(|| {
            (y - self.rect.y0) as usize * self.stride + (x - self.rect.x0) as usize
        })
    }
}

#[derive(Copy, Clone, Debug)]
enum CoverageData<'a> {
    Mask16 { data: &'a [u32], stride: usize },
    Alpha8(&'a AlphaImage),
}

/// Per pixel coverage positioned in destination space.
#[derive(Copy, Clone, Debug)]
pub struct Coverage<'a> {
    data: CoverageData<'a>,
    origin: Point<i32>,
}

impl<'a> Coverage<'a> {
    /// Coverage from 16-bit values laid out in rows of `stride` elements,
    /// with the first element landing on `origin`.
    pub fn mask16(data: &'a [u32], stride: usize, origin: Point<i32>) -> Self {
        Self {
            data: CoverageData::Mask16 { data, stride },
            origin,
        }
    }

    /// Coverage from the alpha of `image` where the image point
    /// `mask_origin` lands on `dest`.
    pub fn alpha(image: &'a AlphaImage, mask_origin: Point<i32>, dest: Point<i32>) -> Self {
        Self {
            data: CoverageData::Alpha8(image),
            origin: Point::new(
                dest.x.wrapping_sub(mask_origin.x),
                dest.y.wrapping_sub(mask_origin.y),
            ),
        }
    }

    /// Returns the destination rectangle where the coverage may be nonzero.
    pub fn bounds(&self) -> IntRect {
        match self.data {
            CoverageData::Mask16 { data, stride } => {
                let height = data.len().checked_div(stride).unwrap_or(0);
                IntRect::from_size(
                    stride.min(i32::MAX as usize) as i32,
                    height.min(i32::MAX as usize) as i32,
                )
                .translate(self.origin)
            }
            CoverageData::Alpha8(image) => image.bounds().translate(self.origin),
        }
    }

    /// Returns 16-bit coverage at destination pixel (x, y).
    pub fn at(&self, x: i32, y: i32) -> u32 {
        let (Some(mx), Some(my)) = (x.checked_sub(self.origin.x), y.checked_sub(self.origin.y))
        else {
            return 0;
        };
        match self.data {
            CoverageData::Mask16 { data, stride } => {
                if mx < 0 || my < 0 || mx as usize >= stride {
                    return 0;
                }
                data.get(my as usize * stride + mx as usize)
                    .map_or(0, |v| (*v).min(0xffff))
            }
            CoverageData::Alpha8(image) => image.alpha_at(mx, my) as u32 * 0x101,
        }
    }
}

/// Destination for compositing coverage.
pub trait Canvas {
    /// Returns the rectangle of addressable pixels.
    fn bounds(&self) -> IntRect;

    /// Composites `paint` through `coverage` onto every pixel of `r`.
    ///
    /// Pixels of `r` outside of [`bounds`](Self::bounds) are skipped.
    fn composite(&mut self, r: IntRect, coverage: &Coverage<'_>, paint: Color, op: Op);

    /// Returns the canvas as an alpha image when it is one.
    ///
    /// Alpha canvases allow the rasterizer to write coverage directly.
    fn as_alpha_mut(&mut self) -> Option<&mut AlphaImage> {
        None
    }
}

impl Canvas for AlphaImage {
    fn bounds(&self) -> IntRect {
        self.rect
    }

    fn composite(&mut self, r: IntRect, coverage: &Coverage<'_>, paint: Color, op: Op) {
        let r = r.intersect(&self.rect);
        let sa = paint.a as u32 * 0x101;
        for y in r.y0..r.y1 {
            for x in r.x0..r.x1 {
                let ma = coverage.at(x, y);
                let Some(p) = self.offset(x, y).and_then(|i| self.pix.get_mut(i)) else {
                    continue;
                };
                let out = match op {
                    Op::Over => {
                        let a = 0xffff - div_ffff(sa * ma);
                        div_ffff(*p as u32 * 0x101 * a + sa * ma)
                    }
                    Op::Src => div_ffff(sa * ma),
                };
                *p = (out >> 8) as u8;
            }
        }
    }

    fn as_alpha_mut(&mut self) -> Option<&mut AlphaImage> {
        Some(self)
    }
}

impl Canvas for RgbaImage {
    fn bounds(&self) -> IntRect {
        self.rect
    }

    fn composite(&mut self, r: IntRect, coverage: &Coverage<'_>, paint: Color, op: Op) {
        let r = r.intersect(&self.rect);
        let src = paint.to_rgba16();
        for y in r.y0..r.y1 {
            for x in r.x0..r.x1 {
                let ma = coverage.at(x, y);
                let Some(p) = self.offset(x, y).and_then(|i| self.pix.get_mut(i)) else {
                    continue;
                };
                let dst = [p.r, p.g, p.b, p.a];
                let out = match op {
                    Op::Over => {
                        let a = 0xffff - div_ffff(src[3] * ma);
                        let mut out = [0u8; 4];
                        for i in 0..4 {
                            let blended = div_ffff(dst[i] as u32 * 0x101 * a + src[i] * ma);
                            out[i] = (blended >> 8) as u8;
                        }
                        out
                    }
                    Op::Src => src.map(|s| (div_ffff(s * ma) >> 8) as u8),
                };
                *p = Color::new(out[0], out[1], out[2], out[3]);
            }
        }
    }
}

/// Composites `paint` through the alpha of `mask` onto the `r` region of
/// `dst`, with the mask point `mask_origin` aligned to the top-left corner
/// of `r`.
pub fn draw_mask<C: Canvas + ?Sized>(
    dst: &mut C,
    r: IntRect,
    mask: &AlphaImage,
    mask_origin: Point<i32>,
    paint: Color,
    op: Op,
) {
    let coverage = Coverage::alpha(mask, mask_origin, r.min());
    let clip = r
        .intersect(&dst.bounds())
        .intersect(&coverage.bounds());
    if clip.is_empty() {
        return;
    }
    dst.composite(clip, &coverage, paint, op);
}
