//! One pixel at a time.

use super::{
    blend_over, fixed_alpha16, fixed_alpha8, floating_alpha16, floating_alpha8, FillRule,
};

pub(super) fn fixed_accumulate_op_src(dst: &mut [u8], src: &[u32], rule: FillRule) {
    // Sanity check that dst is long enough.
    if dst.len() < src.len() {
        return;
    }
    let mut acc = 0u32;
    for (d, &v) in dst.iter_mut().zip(src) {
        acc = acc.wrapping_add(v);
        *d = fixed_alpha8(acc, rule);
    }
}

pub(super) fn fixed_accumulate_op_over(dst: &mut [u8], src: &[u32], rule: FillRule) {
    if dst.len() < src.len() {
        return;
    }
    let mut acc = 0u32;
    for (d, &v) in dst.iter_mut().zip(src) {
        acc = acc.wrapping_add(v);
        *d = blend_over(*d, fixed_alpha16(acc, rule));
    }
}

pub(super) fn fixed_accumulate_mask(dst: &mut [u32], src: &[u32], rule: FillRule) {
    if dst.len() < src.len() {
        return;
    }
    let mut acc = 0u32;
    for (d, &v) in dst.iter_mut().zip(src) {
        acc = acc.wrapping_add(v);
        *d = fixed_alpha16(acc, rule);
    }
}

pub(super) fn floating_accumulate_op_src(dst: &mut [u8], src: &[f32], rule: FillRule) {
    if dst.len() < src.len() {
        return;
    }
    let mut acc = 0f32;
    for (d, &v) in dst.iter_mut().zip(src) {
        acc += v;
        *d = floating_alpha8(acc, rule);
    }
}

pub(super) fn floating_accumulate_op_over(dst: &mut [u8], src: &[f32], rule: FillRule) {
    if dst.len() < src.len() {
        return;
    }
    let mut acc = 0f32;
    for (d, &v) in dst.iter_mut().zip(src) {
        acc += v;
        *d = blend_over(*d, floating_alpha16(acc, rule));
    }
}

pub(super) fn floating_accumulate_mask(dst: &mut [u32], src: &[f32], rule: FillRule) {
    if dst.len() < src.len() {
        return;
    }
    let mut acc = 0f32;
    for (d, &v) in dst.iter_mut().zip(src) {
        acc += v;
        *d = floating_alpha16(acc, rule);
    }
}
