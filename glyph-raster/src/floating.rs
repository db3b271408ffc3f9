//! Line scan conversion with floating point arithmetic.

use glyph_types::Point;

/// Magnitude bound for pixel indices.
const LIMIT: f32 = (1u64 << 40) as f32;

#[inline(always)]
fn index(v: f32) -> i64 {
    // NaN converts to zero
    v.clamp(-LIMIT, LIMIT) as i64
}

#[inline(always)]
fn column(i: i64, width: i64) -> usize {
    i.clamp(0, width) as usize
}

#[inline(always)]
fn add(row: &mut [f32], i: usize, v: f32) {
    if let Some(cell) = row.get_mut(i) {
        *cell += v;
    }
}

fn add_span(row: &mut [f32], lo: i64, hi: i64, width: i64, v: f32) {
    if lo >= hi {
        return;
    }
    let left = hi.min(0) - lo;
    if left > 0 {
        add(row, 0, left as f32 * v);
    }
    let right = hi - lo.max(width);
    if right > 0 {
        add(row, width as usize, right as f32 * v);
    }
    for i in lo.max(0)..hi.min(width) {
        add(row, i as usize, v);
    }
}

/// Accumulates the signed area contribution of the segment `a`-`b` into
/// `buf`, a `width` by `height` grid of cells where a fully covered pixel
/// contributes 1.0.
pub(crate) fn line_to(buf: &mut [f32], width: usize, height: usize, a: Point<f32>, b: Point<f32>) {
    let (mut a, mut b, mut dir) = (a, b, 1.0f32);
    if a.y > b.y {
        core::mem::swap(&mut a, &mut b);
        dir = -1.0;
    }
    if !(b.y - a.y > 0.000001) {
        return;
    }
    let dxdy = (b.x - a.x) / (b.y - a.y);

    let width = width as i64;
    let mut x = a.x;
    let mut y = index(a.y.floor());
    let y_max = index(b.y.ceil()).min(height as i64);
    if y_max <= 0 || width == 0 {
        return;
    }
    if y < 0 {
        x += -a.y * dxdy;
        y = 0;
    }

    while y < y_max {
        let dy = ((y + 1) as f32).min(b.y) - (y as f32).max(a.y);
        let x_next = x + dy * dxdy;
        let start = (y * width) as usize;
        let Some(row) = buf.get_mut(start..) else {
            return;
        };
        let d = dy * dir;

        let (x0, x1) = if x > x_next { (x_next, x) } else { (x, x_next) };
        let x0i = index(x0.floor());
        let x0_floor = x0i as f32;
        let x1i = index(x1.ceil());
        let x1_ceil = x1i as f32;

        if x1i <= x0i + 1 {
            let xmf = 0.5 * (x + x_next) - x0_floor;
            add(row, column(x0i, width), d - d * xmf);
            add(row, column(x0i + 1, width), d * xmf);
        } else {
            let s = 1.0 / (x1 - x0);
            let x0f = x0 - x0_floor;
            let one_minus_x0f = 1.0 - x0f;
            let a0 = 0.5 * s * one_minus_x0f * one_minus_x0f;
            let x1f = x1 - x1_ceil + 1.0;
            let am = 0.5 * s * x1f * x1f;

            add(row, column(x0i, width), d * a0);

            if x1i == x0i + 2 {
                add(row, column(x0i + 1, width), d * (1.0 - a0 - am));
            } else {
                let a1 = s * (1.5 - x0f);
                add(row, column(x0i + 1, width), d * (a1 - a0));

                add_span(row, x0i + 2, x1i - 1, width, d * s);

                let a2 = a1 + s * (x1i - x0i - 3) as f32;
                add(row, column(x1i - 1, width), d * (1.0 - a2 - am));
            }

            add(row, column(x1i, width), d * am);
        }

        x = x_next;
        y += 1;
    }
}
