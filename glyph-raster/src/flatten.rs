//! Segment counts for uniform curve flattening.
//!
//! A curve is split at `t = i / n` for `i` in `1..n`. The distance between
//! a curve and the chord over a parameter interval of length `h` is at most
//! `max|B''| * h^2 / 8`, which bounds `n` from the second differences of the
//! control points.

use glyph_types::Point;

/// Maximum distance, in pixels, between a curve and its flattened lines.
pub const FLATTEN_TOLERANCE: f32 = 0.125;

/// Upper bound on the number of lines a single curve is split into.
pub const MAX_SEGMENTS: u32 = 4096;

#[inline]
fn second_difference(a: Point<f32>, b: Point<f32>, c: Point<f32>) -> f32 {
    let x = a.x - 2.0 * b.x + c.x;
    let y = a.y - 2.0 * b.y + c.y;
    (x * x + y * y).sqrt()
}

/// Returns the number of lines for a curve whose error over the whole
/// parameter range is bounded by `error`.
fn segments(error: f32) -> u32 {
    let n = (error / FLATTEN_TOLERANCE).sqrt().ceil();
    if n >= MAX_SEGMENTS as f32 {
        MAX_SEGMENTS
    } else if n >= 1.0 {
        n as u32
    } else {
        // also catches NaN
        1
    }
}

/// Number of lines for the quadratic curve `a`, `b`, `c`.
pub(crate) fn quad_segments(a: Point<f32>, b: Point<f32>, c: Point<f32>) -> u32 {
    // |B''| = 2 * |a - 2b + c|
    segments(0.25 * second_difference(a, b, c))
}

/// Number of lines for the cubic curve `a`, `b`, `c`, `d`.
pub(crate) fn cubic_segments(a: Point<f32>, b: Point<f32>, c: Point<f32>, d: Point<f32>) -> u32 {
    // |B''| <= 6 * max(|a - 2b + c|, |b - 2c + d|)
    let dd = second_difference(a, b, c).max(second_difference(b, c, d));
    segments(0.75 * dd)
}
