//! Four pixels at a time.
//!
//! Blocks are plain arrays so the compiler is free to map them onto vector
//! registers. The fixed point prefix sum runs in log steps across the
//! lanes, which is exact under wrapping addition. The floating point prefix
//! sum stays sequential since reassociating f32 additions would change the
//! result; only the conversion and store steps are batched.

use super::{
    div_ffff, fixed_alpha16, fixed_alpha8, floating_alpha16, floating_alpha8, FillRule,
};

const LANES: usize = 4;

type Block<T> = [T; LANES];

#[inline(always)]
fn load<T: Copy>(s: &[T]) -> Block<T> {
    [s[0], s[1], s[2], s[3]]
}

/// Inclusive prefix sum of a block, offset by the running total.
#[inline(always)]
fn prefix_sum(x: Block<u32>, offset: u32) -> Block<u32> {
    // x += x shifted by one lane, then by two lanes
    let x = [
        x[0],
        x[1].wrapping_add(x[0]),
        x[2].wrapping_add(x[1]),
        x[3].wrapping_add(x[2]),
    ];
    let x = [
        x[0],
        x[1],
        x[2].wrapping_add(x[0]),
        x[3].wrapping_add(x[1]),
    ];
    x.map(|v| v.wrapping_add(offset))
}

#[inline(always)]
fn floating_prefix_sum(x: Block<f32>, acc: &mut f32) -> Block<f32> {
    x.map(|v| {
        *acc += v;
        *acc
    })
}

#[inline(always)]
fn blend_over(dst: Block<u8>, mask_a: Block<u32>) -> Block<u8> {
    let mut out = [0u8; LANES];
    for i in 0..LANES {
        let dst_a = dst[i] as u32 * 0x101;
        let out_a = div_ffff(dst_a * (0xffff - mask_a[i])) + mask_a[i];
        out[i] = (out_a >> 8) as u8;
    }
    out
}

pub(super) fn fixed_accumulate_op_src(dst: &mut [u8], src: &[u32], rule: FillRule) {
    // Sanity check that dst is long enough.
    if dst.len() < src.len() {
        return;
    }
    let dst = &mut dst[..src.len()];
    let mut offset = 0u32;
    let mut dst_blocks = dst.chunks_exact_mut(LANES);
    let mut src_blocks = src.chunks_exact(LANES);
    for (d, s) in (&mut dst_blocks).zip(&mut src_blocks) {
        let acc = prefix_sum(load(s), offset);
        offset = acc[3];
        d.copy_from_slice(&acc.map(|a| fixed_alpha8(a, rule)));
    }
    let tail = dst_blocks.into_remainder().iter_mut();
    for (d, &v) in tail.zip(src_blocks.remainder()) {
        offset = offset.wrapping_add(v);
        *d = fixed_alpha8(offset, rule);
    }
}

pub(super) fn fixed_accumulate_op_over(dst: &mut [u8], src: &[u32], rule: FillRule) {
    if dst.len() < src.len() {
        return;
    }
    let dst = &mut dst[..src.len()];
    let mut offset = 0u32;
    let mut dst_blocks = dst.chunks_exact_mut(LANES);
    let mut src_blocks = src.chunks_exact(LANES);
    for (d, s) in (&mut dst_blocks).zip(&mut src_blocks) {
        let acc = prefix_sum(load(s), offset);
        offset = acc[3];
        let mask = acc.map(|a| fixed_alpha16(a, rule));
        let out = blend_over(load(d), mask);
        d.copy_from_slice(&out);
    }
    let tail = dst_blocks.into_remainder().iter_mut();
    for (d, &v) in tail.zip(src_blocks.remainder()) {
        offset = offset.wrapping_add(v);
        *d = super::blend_over(*d, fixed_alpha16(offset, rule));
    }
}

pub(super) fn fixed_accumulate_mask(dst: &mut [u32], src: &[u32], rule: FillRule) {
    if dst.len() < src.len() {
        return;
    }
    let dst = &mut dst[..src.len()];
    let mut offset = 0u32;
    let mut dst_blocks = dst.chunks_exact_mut(LANES);
    let mut src_blocks = src.chunks_exact(LANES);
    for (d, s) in (&mut dst_blocks).zip(&mut src_blocks) {
        let acc = prefix_sum(load(s), offset);
        offset = acc[3];
        d.copy_from_slice(&acc.map(|a| fixed_alpha16(a, rule)));
    }
    let tail = dst_blocks.into_remainder().iter_mut();
    for (d, &v) in tail.zip(src_blocks.remainder()) {
        offset = offset.wrapping_add(v);
        *d = fixed_alpha16(offset, rule);
    }
}

pub(super) fn floating_accumulate_op_src(dst: &mut [u8], src: &[f32], rule: FillRule) {
    if dst.len() < src.len() {
        return;
    }
    let dst = &mut dst[..src.len()];
    let mut acc = 0f32;
    let mut dst_blocks = dst.chunks_exact_mut(LANES);
    let mut src_blocks = src.chunks_exact(LANES);
    for (d, s) in (&mut dst_blocks).zip(&mut src_blocks) {
        let sums = floating_prefix_sum(load(s), &mut acc);
        d.copy_from_slice(&sums.map(|a| floating_alpha8(a, rule)));
    }
    let tail = dst_blocks.into_remainder().iter_mut();
    for (d, &v) in tail.zip(src_blocks.remainder()) {
        acc += v;
        *d = floating_alpha8(acc, rule);
    }
}

pub(super) fn floating_accumulate_op_over(dst: &mut [u8], src: &[f32], rule: FillRule) {
    if dst.len() < src.len() {
        return;
    }
    let dst = &mut dst[..src.len()];
    let mut acc = 0f32;
    let mut dst_blocks = dst.chunks_exact_mut(LANES);
    let mut src_blocks = src.chunks_exact(LANES);
    for (d, s) in (&mut dst_blocks).zip(&mut src_blocks) {
        let sums = floating_prefix_sum(load(s), &mut acc);
        let mask = sums.map(|a| floating_alpha16(a, rule));
        let out = blend_over(load(d), mask);
        d.copy_from_slice(&out);
    }
    let tail = dst_blocks.into_remainder().iter_mut();
    for (d, &v) in tail.zip(src_blocks.remainder()) {
        acc += v;
        *d = super::blend_over(*d, floating_alpha16(acc, rule));
    }
}

pub(super) fn floating_accumulate_mask(dst: &mut [u32], src: &[f32], rule: FillRule) {
    if dst.len() < src.len() {
        return;
    }
    let dst = &mut dst[..src.len()];
    let mut acc = 0f32;
    let mut dst_blocks = dst.chunks_exact_mut(LANES);
    let mut src_blocks = src.chunks_exact(LANES);
    for (d, s) in (&mut dst_blocks).zip(&mut src_blocks) {
        let sums = floating_prefix_sum(load(s), &mut acc);
        d.copy_from_slice(&sums.map(|a| floating_alpha16(a, rule)));
    }
    let tail = dst_blocks.into_remainder().iter_mut();
    for (d, &v) in tail.zip(src_blocks.remainder()) {
        acc += v;
        *d = floating_alpha16(acc, rule);
    }
}
