//! Coverage accumulation for vector paths.

use glyph_types::{IntRect, OutlinePen, Point};

use crate::{
    buffer,
    error::{RasterError, MAX_AREA},
    fixed, flatten, floating,
    image::{Canvas, Color, Coverage, Op},
    kernel::{Backend, FillRule},
};

/// Width or height above which [`Precision::Auto`] selects floating point
/// math.
pub const FLOATING_POINT_THRESHOLD: i32 = 512;

/// Arithmetic used for accumulation.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Hash)]
pub enum Precision {
    /// Fixed point for small rasters, floating point for large ones.
    #[default]
    Auto,
    /// Always use fixed point.
    Fixed,
    /// Always use floating point.
    Floating,
}

/// Anti-aliasing rasterizer for filled paths.
///
/// Paths are built with [`move_to`](Self::move_to),
/// [`line_to`](Self::line_to), [`quad_to`](Self::quad_to),
/// [`cubic_to`](Self::cubic_to) and [`close_path`](Self::close_path) in
/// pixel coordinates, then turned into coverage with [`draw`](Self::draw).
/// Each segment adds its signed area to the cells it crosses, so contours
/// must be closed for the accumulated coverage to balance.
///
/// All scratch memory is kept between uses and only grows.
#[derive(Clone, Default, Debug)]
pub struct Rasterizer {
    acc_fixed: Vec<u32>,
    acc_floating: Vec<f32>,
    mask: Vec<u32>,
    width: usize,
    height: usize,
    first: Point<f32>,
    pen: Point<f32>,
    use_floating: bool,
    op: Op,
    fill_rule: FillRule,
    precision: Precision,
    backend: Backend,
}

impl Rasterizer {
    /// Creates an empty rasterizer with a size of zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rasterizer ready to accumulate a `width` by `height` area.
    pub fn with_size(width: i32, height: i32) -> Result<Self, RasterError> {
        let mut raster = Self::new();
        raster.reset(width, height)?;
        Ok(raster)
    }

    /// Discards any accumulated coverage and prepares for a `width` by
    /// `height` area.
    ///
    /// The pen and the draw operator are reset as well; the draw operator
    /// returns to [`Op::Over`]. Sizes that are negative or exceed
    /// [`MAX_AREA`] leave the rasterizer empty.
    pub fn reset(&mut self, width: i32, height: i32) -> Result<(), RasterError> {
        let area = width as i64 * height as i64;
        if width < 0 || height < 0 || area as u64 > MAX_AREA {
            log::warn!("rejecting raster size {width}x{height}");
            self.resize(0, 0);
            return Err(RasterError::InvalidSize { width, height });
        }
        self.resize(width as usize, height as usize);
        Ok(())
    }

    fn resize(&mut self, width: usize, height: usize) {
        let threshold = FLOATING_POINT_THRESHOLD as usize;
        self.use_floating = match self.precision {
            Precision::Auto => width > threshold || height > threshold,
            Precision::Fixed => false,
            Precision::Floating => true,
        };
        log::trace!(
            "raster {width}x{height}, floating point: {}",
            self.use_floating
        );
        let len = width * height;
        if self.use_floating {
            buffer::reset_zeroed(&mut self.acc_floating, len);
        } else {
            buffer::reset_zeroed(&mut self.acc_fixed, len);
        }
        self.width = width;
        self.height = height;
        self.first = Point::default();
        self.pen = Point::default();
        self.op = Op::Over;
    }

    /// Releases all scratch memory, leaving an empty rasterizer with the
    /// same settings.
    pub fn release(&mut self) {
        self.acc_fixed = Vec::new();
        self.acc_floating = Vec::new();
        self.mask = Vec::new();
        self.width = 0;
        self.height = 0;
        self.first = Point::default();
        self.pen = Point::default();
    }

    /// Returns the width and height.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the area covered, with its top-left corner at the origin.
    pub fn bounds(&self) -> IntRect {
        IntRect::from_size(self.width as i32, self.height as i32)
    }

    /// Returns the current point.
    pub fn pen(&self) -> Point<f32> {
        self.pen
    }

    pub fn op(&self) -> Op {
        self.op
    }

    /// Sets the compositing operator used by [`draw`](Self::draw).
    pub fn set_op(&mut self, op: Op) {
        self.op = op;
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.fill_rule = fill_rule;
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Sets the arithmetic precision. Takes effect at the next
    /// [`reset`](Self::reset).
    pub fn set_precision(&mut self, precision: Precision) {
        self.precision = precision;
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn set_backend(&mut self, backend: Backend) {
        self.backend = backend;
    }

    /// Returns true if the current accumulation uses floating point math.
    pub fn uses_floating_point(&self) -> bool {
        self.use_floating
    }

    /// Returns the number of cells the active accumulation buffer can hold
    /// without reallocating.
    pub fn capacity(&self) -> usize {
        if self.use_floating {
            self.acc_floating.capacity()
        } else {
            self.acc_fixed.capacity()
        }
    }

    /// Starts a new contour at (x, y).
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.first = Point::new(x, y);
        self.pen = self.first;
    }

    /// Adds a line from the current point to (x, y).
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.line_to_point(Point::new(x, y));
    }

    /// Adds a quadratic curve from the current point through the control
    /// point (cx, cy) to (x, y).
    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let a = self.pen;
        let b = Point::new(cx, cy);
        let c = Point::new(x, y);
        let n = flatten::quad_segments(a, b, c);
        for i in 1..n {
            let t = i as f32 / n as f32;
            let ab = a.lerp(b, t);
            let bc = b.lerp(c, t);
            self.line_to_point(ab.lerp(bc, t));
        }
        self.line_to_point(c);
    }

    /// Adds a cubic curve from the current point through the control points
    /// (cx0, cy0) and (cx1, cy1) to (x, y).
    pub fn cubic_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let a = self.pen;
        let b = Point::new(cx0, cy0);
        let c = Point::new(cx1, cy1);
        let d = Point::new(x, y);
        let n = flatten::cubic_segments(a, b, c, d);
        for i in 1..n {
            let t = i as f32 / n as f32;
            let ab = a.lerp(b, t);
            let bc = b.lerp(c, t);
            let cd = c.lerp(d, t);
            let abc = ab.lerp(bc, t);
            let bcd = bc.lerp(cd, t);
            self.line_to_point(abc.lerp(bcd, t));
        }
        self.line_to_point(d);
    }

    /// Closes the current contour with a line back to its first point.
    pub fn close_path(&mut self) {
        self.line_to_point(self.first);
    }

    fn line_to_point(&mut self, b: Point<f32>) {
        let a = self.pen;
        self.pen = b;
        if self.use_floating {
            floating::line_to(&mut self.acc_floating, self.width, self.height, a, b);
        } else {
            fixed::line_to(&mut self.acc_fixed, self.width, self.height, a, b);
        }
    }

    /// Converts the accumulated area into 16-bit coverage, one value per
    /// pixel in rows of [`size`](Self::size)`.0` values.
    pub fn accumulate_mask(&mut self) -> &[u32] {
        let len = self.width * self.height;
        buffer::reset_zeroed(&mut self.mask, len);
        if self.use_floating {
            self.backend
                .floating_accumulate_mask(&mut self.mask, &self.acc_floating, self.fill_rule);
        } else {
            self.backend
                .fixed_accumulate_mask(&mut self.mask, &self.acc_fixed, self.fill_rule);
        }
        &self.mask
    }

    /// Composites `paint` through the accumulated coverage onto the `r`
    /// region of `dst` using the current operator.
    ///
    /// The top-left pixel of the rasterizer lands on the top-left corner of
    /// `r`; pixels outside of `dst` are skipped. Accumulated coverage is left
    /// intact.
    pub fn draw<C: Canvas + ?Sized>(&mut self, dst: &mut C, r: IntRect, paint: Color) {
        let bounds = self.bounds();
        if paint.is_opaque() && r == bounds {
            if let Some(image) = dst.as_alpha_mut() {
                if image.bounds() == r && image.stride() == self.width {
                    self.accumulate_into(image.pixels_mut());
                    return;
                }
            }
        }
        let clip = r
            .intersect(&dst.bounds())
            .intersect(&bounds.translate(r.min()));
        if clip.is_empty() {
            return;
        }
        let (width, op) = (self.width, self.op);
        let mask = self.accumulate_mask();
        let coverage = Coverage::mask16(mask, width, r.min());
        dst.composite(clip, &coverage, paint, op);
    }

    fn accumulate_into(&self, pixels: &mut [u8]) {
        if self.use_floating {
            self.backend
                .floating_accumulate(pixels, &self.acc_floating, self.op, self.fill_rule);
        } else {
            self.backend
                .fixed_accumulate(pixels, &self.acc_fixed, self.op, self.fill_rule);
        }
    }
}

impl OutlinePen for Rasterizer {
    fn move_to(&mut self, x: f32, y: f32) {
        Rasterizer::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        Rasterizer::line_to(self, x, y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        Rasterizer::quad_to(self, cx0, cy0, x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.cubic_to(cx0, cy0, cx1, cy1, x, y);
    }

    fn close(&mut self) {
        self.close_path();
    }
}
