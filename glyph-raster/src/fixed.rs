//! Line scan conversion with fixed point arithmetic.
//!
//! Positions carry [`PHI`] fractional bits. Accumulated areas carry twice as
//! many, so a fully covered pixel contributes `1 << (2 * PHI)` to the
//! running sum. Intermediate products are computed in 64 bits and the
//! per-cell contributions are added to the buffer with wrapping 32-bit
//! arithmetic; only the prefix sum of a row is meaningful.

use glyph_types::Point;

/// Number of fractional bits in a position.
pub(crate) const PHI: u32 = 10;

const ONE: i64 = 1 << PHI;
const ONE_AND_A_HALF: i64 = ONE + (ONE >> 1);
const ONE_MINUS_IOTA: i64 = ONE - 1;

/// Magnitude bound for positions, keeping every product below 2^63.
const LIMIT: f32 = (1u64 << 52) as f32;

#[inline(always)]
fn to_fixed(v: f32) -> i64 {
    // NaN converts to zero
    v.clamp(-LIMIT, LIMIT) as i64
}

#[inline(always)]
fn floor(x: i64) -> i64 {
    x >> PHI
}

#[inline(always)]
fn ceil(x: i64) -> i64 {
    (x + ONE_MINUS_IOTA) >> PHI
}

/// Maps a column to its cell in a row. Columns left of the row land on the
/// first cell and columns right of it land one past the last cell, which
/// belongs to the next row or is dropped.
#[inline(always)]
fn column(i: i64, width: i64) -> usize {
    i.clamp(0, width) as usize
}

#[inline(always)]
fn add(row: &mut [u32], i: usize, v: i64) {
    if let Some(cell) = row.get_mut(i) {
        *cell = cell.wrapping_add(v as u32);
    }
}

/// Adds `v` to the cells for every column in `lo..hi`.
fn add_span(row: &mut [u32], lo: i64, hi: i64, width: i64, v: u32) {
    if lo >= hi {
        return;
    }
    let left = hi.min(0) - lo;
    if left > 0 {
        if let Some(cell) = row.first_mut() {
            *cell = cell.wrapping_add(v.wrapping_mul(left as u32));
        }
    }
    let right = hi - lo.max(width);
    if right > 0 {
        if let Some(cell) = row.get_mut(width as usize) {
            *cell = cell.wrapping_add(v.wrapping_mul(right as u32));
        }
    }
    for i in lo.max(0)..hi.min(width) {
        add(row, i as usize, v as i64);
    }
}

/// Accumulates the signed area contribution of the segment `a`-`b` into
/// `buf`, a `width` by `height` grid of cells.
pub(crate) fn line_to(buf: &mut [u32], width: usize, height: usize, a: Point<f32>, b: Point<f32>) {
    let (mut a, mut b, mut dir) = (a, b, 1i64);
    if a.y > b.y {
        core::mem::swap(&mut a, &mut b);
        dir = -1;
    }
    // Horizontal segments change no coverage. Nearly horizontal ones are
    // dropped as well since 1 / (b.y - a.y) is unstable.
    if !(b.y - a.y > 0.000001) {
        return;
    }
    let dxdy = (b.x - a.x) / (b.y - a.y);

    let ay = to_fixed(a.y * ONE as f32);
    let by = to_fixed(b.y * ONE as f32);
    let width = width as i64;
    let mut x = to_fixed(a.x * ONE as f32);
    let mut y = floor(ay);
    let y_max = ceil(by).min(height as i64);
    if y_max <= 0 || width == 0 {
        return;
    }
    if y < 0 {
        // rows above the grid only move x along
        x += to_fixed(-ay as f32 * dxdy);
        y = 0;
    }

    while y < y_max {
        let dy = ((y + 1) << PHI).min(by) - (y << PHI).max(ay);
        let x_next = x + to_fixed(dy as f32 * dxdy);
        let start = (y * width) as usize;
        let Some(row) = buf.get_mut(start..) else {
            return;
        };
        let d = dy * dir;

        let (x0, x1) = if x > x_next { (x_next, x) } else { (x, x_next) };
        let x0i = floor(x0);
        let x0_floor = x0i << PHI;
        let x1i = ceil(x1);
        let x1_ceil = x1i << PHI;

        if x1i <= x0i + 1 {
            let xmf = ((x + x_next) >> 1) - x0_floor;
            add(row, column(x0i, width), d * (ONE - xmf));
            add(row, column(x0i + 1, width), d * xmf);
        } else {
            let one_over_s = x1 - x0;
            let two_over_s = 2 * one_over_s;
            let x0f = x0 - x0_floor;
            let one_minus_x0f = ONE - x0f;
            let one_minus_x0f_squared = one_minus_x0f * one_minus_x0f;
            let x1f = x1 - x1_ceil + ONE;
            let x1f_squared = x1f * x1f;

            add(
                row,
                column(x0i, width),
                one_minus_x0f_squared * d / two_over_s,
            );

            if x1i == x0i + 2 {
                let area = (two_over_s << PHI) - one_minus_x0f_squared - x1f_squared;
                add(row, column(x0i + 1, width), area * d / two_over_s);
            } else {
                let area = ((ONE_AND_A_HALF - x0f) << (PHI + 1)) - one_minus_x0f_squared;
                add(row, column(x0i + 1, width), area * d / two_over_s);

                let d_times_s = ((d << (2 * PHI)) / one_over_s) as u32;
                add_span(row, x0i + 2, x1i - 1, width, d_times_s);

                const C: i64 = (1 << (PHI + 2)) - (ONE_AND_A_HALF << 1);
                let area = (((x1f << 1) + C) << PHI) - x1f_squared;
                add(row, column(x1i - 1, width), area * d / two_over_s);
            }

            add(row, column(x1i, width), x1f_squared * d / two_over_s);
        }

        x = x_next;
        y += 1;
    }
}
