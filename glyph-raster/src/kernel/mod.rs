//! Accumulation kernels.
//!
//! After scan conversion each cell holds the change in signed area relative
//! to the cell before it. A kernel runs a prefix sum over the whole buffer,
//! folds the sum with a [`FillRule`], and then stores the resulting alpha
//! ([`Op::Src`]), blends it under the existing alpha ([`Op::Over`]) or
//! emits 16-bit coverage for general compositing.
//!
//! Every kernel exists in a [`Scalar`](Backend::Scalar) and a
//! [`Wide`](Backend::Wide) flavor. Both produce identical output for
//! identical input.

mod scalar;
mod wide;

use crate::{fixed::PHI, Op};

/// Rule for turning accumulated winding area into coverage.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Hash)]
pub enum FillRule {
    /// Coverage is the absolute accumulated area, saturating at full.
    #[default]
    NonZero,
    /// Coverage folds the accumulated area modulo two, so overlapping
    /// regions with an even winding count are empty.
    EvenOdd,
}

/// Selects the implementation of the accumulation kernels.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Hash)]
pub enum Backend {
    /// One pixel at a time.
    Scalar,
    /// Four pixels at a time.
    #[default]
    Wide,
}

/// Accumulated area of a fully covered pixel in the fixed point path.
const FIXED_ONE: u32 = 1 << (2 * PHI);
const FIXED_SHIFT_8: u32 = 2 * PHI - 8;
const FIXED_SHIFT_16: u32 = 2 * PHI - 16;

/// The largest f32 below 256.
const ALMOST_256: f32 = f32::from_bits(0x437f_ffff);
/// The largest f32 below 65536.
const ALMOST_65536: f32 = f32::from_bits(0x477f_ffff);

/// Computes `x / 0xffff` without a division.
///
/// The result is exact for every `u32`.
#[inline(always)]
pub fn div_ffff(x: u32) -> u32 {
    ((x as u64 * 0x8000_8001) >> 47) as u32
}

#[inline(always)]
fn fixed_coverage(acc: u32, rule: FillRule) -> u32 {
    let a = (acc as i32).unsigned_abs();
    match rule {
        FillRule::NonZero => a,
        FillRule::EvenOdd => {
            let a = a & (2 * FIXED_ONE - 1);
            if a > FIXED_ONE {
                2 * FIXED_ONE - a
            } else {
                a
            }
        }
    }
}

#[inline(always)]
fn fixed_alpha8(acc: u32, rule: FillRule) -> u8 {
    (fixed_coverage(acc, rule) >> FIXED_SHIFT_8).min(0xff) as u8
}

#[inline(always)]
fn fixed_alpha16(acc: u32, rule: FillRule) -> u32 {
    (fixed_coverage(acc, rule) >> FIXED_SHIFT_16).min(0xffff)
}

#[inline(always)]
fn floating_coverage(acc: f32, rule: FillRule) -> f32 {
    let a = acc.abs();
    match rule {
        FillRule::NonZero => a.min(1.0),
        FillRule::EvenOdd => {
            let a = a % 2.0;
            if a > 1.0 {
                2.0 - a
            } else {
                a
            }
        }
    }
}

#[inline(always)]
fn floating_alpha8(acc: f32, rule: FillRule) -> u8 {
    (ALMOST_256 * floating_coverage(acc, rule)) as u8
}

#[inline(always)]
fn floating_alpha16(acc: f32, rule: FillRule) -> u32 {
    (ALMOST_65536 * floating_coverage(acc, rule)) as u32
}

/// Blends 16-bit coverage under an 8-bit destination alpha.
#[inline(always)]
fn blend_over(dst: u8, mask_a: u32) -> u8 {
    let dst_a = dst as u32 * 0x101;
    let out_a = div_ffff(dst_a * (0xffff - mask_a)) + mask_a;
    (out_a >> 8) as u8
}

impl Backend {
    /// Accumulates fixed point cells in `src` into 8-bit alpha in `dst`.
    ///
    /// Does nothing if `dst` is shorter than `src`.
    pub fn fixed_accumulate(self, dst: &mut [u8], src: &[u32], op: Op, rule: FillRule) {
        match (self, op) {
            (Self::Scalar, Op::Src) => scalar::fixed_accumulate_op_src(dst, src, rule),
            (Self::Scalar, Op::Over) => scalar::fixed_accumulate_op_over(dst, src, rule),
            (Self::Wide, Op::Src) => wide::fixed_accumulate_op_src(dst, src, rule),
            (Self::Wide, Op::Over) => wide::fixed_accumulate_op_over(dst, src, rule),
        }
    }

    /// Accumulates floating point cells in `src` into 8-bit alpha in `dst`.
    ///
    /// Does nothing if `dst` is shorter than `src`.
    pub fn floating_accumulate(self, dst: &mut [u8], src: &[f32], op: Op, rule: FillRule) {
        match (self, op) {
            (Self::Scalar, Op::Src) => scalar::floating_accumulate_op_src(dst, src, rule),
            (Self::Scalar, Op::Over) => scalar::floating_accumulate_op_over(dst, src, rule),
            (Self::Wide, Op::Src) => wide::floating_accumulate_op_src(dst, src, rule),
            (Self::Wide, Op::Over) => wide::floating_accumulate_op_over(dst, src, rule),
        }
    }

    /// Accumulates fixed point cells in `src` into 16-bit coverage in `dst`.
    ///
    /// Does nothing if `dst` is shorter than `src`.
    pub fn fixed_accumulate_mask(self, dst: &mut [u32], src: &[u32], rule: FillRule) {
        match self {
            Self::Scalar => scalar::fixed_accumulate_mask(dst, src, rule),
            Self::Wide => wide::fixed_accumulate_mask(dst, src, rule),
        }
    }

    /// Accumulates floating point cells in `src` into 16-bit coverage in
    /// `dst`.
    ///
    /// Does nothing if `dst` is shorter than `src`.
    pub fn floating_accumulate_mask(self, dst: &mut [u32], src: &[f32], rule: FillRule) {
        match self {
            Self::Scalar => scalar::floating_accumulate_mask(dst, src, rule),
            Self::Wide => wide::floating_accumulate_mask(dst, src, rule),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const RULES: [FillRule; 2] = [FillRule::NonZero, FillRule::EvenOdd];
    const OPS: [Op; 2] = [Op::Src, Op::Over];

    #[test]
    fn div_ffff_over_blend_domain() {
        for d in 0..=0xffu32 {
            let dst_a = d * 0x101;
            for m in 0..=0xffffu32 {
                let x = dst_a * m;
                assert_eq!(div_ffff(x), x / 0xffff, "{dst_a} * {m}");
            }
        }
    }

    #[test]
    fn div_ffff_full_range() {
        for x in [0, 1, 0xfffe, 0xffff, 0x10000, 0xfffe_0001, u32::MAX - 1, u32::MAX] {
            assert_eq!(div_ffff(x), x / 0xffff, "{x:#x}");
        }
        for x in (0..=u32::MAX).step_by(65519) {
            assert_eq!(div_ffff(x), x / 0xffff, "{x:#x}");
        }
        let mut rng = StdRng::seed_from_u64(0xffff);
        for _ in 0..1_000_000 {
            let x: u32 = rng.gen();
            assert_eq!(div_ffff(x), x / 0xffff, "{x:#x}");
        }
    }

    #[test]
    fn fixed_alpha_values() {
        let full = FIXED_ONE;
        assert_eq!(fixed_alpha8(full, FillRule::NonZero), 0xff);
        assert_eq!(fixed_alpha8(full / 2, FillRule::NonZero), 0x80);
        assert_eq!(fixed_alpha8((full as i32 / -2) as u32, FillRule::NonZero), 0x80);
        assert_eq!(fixed_alpha8(3 * full, FillRule::NonZero), 0xff);
        assert_eq!(fixed_alpha16(full, FillRule::NonZero), 0xffff);
        assert_eq!(fixed_alpha16(full / 2, FillRule::NonZero), 0x8000);
        // accumulator overflow saturates instead of wrapping
        assert_eq!(fixed_alpha8(i32::MIN as u32, FillRule::NonZero), 0xff);
    }

    #[test]
    fn floating_alpha_values() {
        assert_eq!(floating_alpha8(1.0, FillRule::NonZero), 0xff);
        assert_eq!(floating_alpha8(-0.5, FillRule::NonZero), 0x7f);
        assert_eq!(floating_alpha8(7.0, FillRule::NonZero), 0xff);
        assert_eq!(floating_alpha8(0.0, FillRule::NonZero), 0);
        assert_eq!(floating_alpha16(1.0, FillRule::NonZero), 0xffff);
        assert_eq!(floating_alpha16(0.5, FillRule::NonZero), 0x7fff);
    }

    #[test]
    fn fixed_and_floating_alpha_within_one() {
        let full = FIXED_ONE;
        for c in (0..=2 * full).step_by(3).chain([full - 1, full, full + 1]) {
            let coverage = c as f32 / full as f32;
            for rule in RULES {
                let (a, b) = (fixed_alpha8(c, rule), floating_alpha8(coverage, rule));
                assert!(a.abs_diff(b) <= 1, "{c}: {a} vs {b}");
                let (a, b) = (fixed_alpha16(c, rule), floating_alpha16(coverage, rule));
                assert!(a.abs_diff(b) <= 1, "{c}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn even_odd_folds_winding() {
        let full = FIXED_ONE;
        assert_eq!(fixed_alpha8(2 * full, FillRule::EvenOdd), 0);
        assert_eq!(fixed_alpha8(3 * full, FillRule::EvenOdd), 0xff);
        assert_eq!(fixed_alpha8(full + full / 2, FillRule::EvenOdd), 0x80);
        assert_eq!(fixed_alpha8((-(full as i32)) as u32, FillRule::EvenOdd), 0xff);
        assert_eq!(floating_alpha8(2.0, FillRule::EvenOdd), 0);
        assert_eq!(floating_alpha8(-3.0, FillRule::EvenOdd), 0xff);
        assert_eq!(floating_alpha8(1.5, FillRule::EvenOdd), 0x7f);
    }

    #[test]
    fn blend_over_endpoints() {
        assert_eq!(blend_over(0, 0xffff), 0xff);
        assert_eq!(blend_over(0x40, 0), 0x40);
        assert_eq!(blend_over(0xff, 0x1234), 0xff);
        assert_eq!(blend_over(0, 0x8000), 0x80);
    }

    fn random_fixed(rng: &mut StdRng, len: usize) -> Vec<u32> {
        let full = FIXED_ONE as i32;
        (0..len)
            .map(|i| {
                if i % 7 == 0 {
                    rng.gen()
                } else {
                    rng.gen_range(-full..=full) as u32
                }
            })
            .collect()
    }

    fn random_floating(rng: &mut StdRng, len: usize) -> Vec<f32> {
        (0..len).map(|_| rng.gen_range(-1.5f32..1.5)).collect()
    }

    #[test]
    fn backends_agree_on_fixed() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in (0..70).chain([255, 256, 1023]) {
            let src = random_fixed(&mut rng, len);
            let prior: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            for rule in RULES {
                for op in OPS {
                    let mut scalar = prior.clone();
                    let mut wide = prior.clone();
                    Backend::Scalar.fixed_accumulate(&mut scalar, &src, op, rule);
                    Backend::Wide.fixed_accumulate(&mut wide, &src, op, rule);
                    assert_eq!(scalar, wide, "len {len}, {op:?}, {rule:?}");
                }
                let mut scalar = vec![0u32; len];
                let mut wide = vec![0u32; len];
                Backend::Scalar.fixed_accumulate_mask(&mut scalar, &src, rule);
                Backend::Wide.fixed_accumulate_mask(&mut wide, &src, rule);
                assert_eq!(scalar, wide, "mask len {len}, {rule:?}");
            }
        }
    }

    #[test]
    fn backends_agree_on_floating() {
        let mut rng = StdRng::seed_from_u64(43);
        for len in (0..70).chain([255, 256, 1023]) {
            let src = random_floating(&mut rng, len);
            let prior: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            for rule in RULES {
                for op in OPS {
                    let mut scalar = prior.clone();
                    let mut wide = prior.clone();
                    Backend::Scalar.floating_accumulate(&mut scalar, &src, op, rule);
                    Backend::Wide.floating_accumulate(&mut wide, &src, op, rule);
                    assert_eq!(scalar, wide, "len {len}, {op:?}, {rule:?}");
                }
                let mut scalar = vec![0u32; len];
                let mut wide = vec![0u32; len];
                Backend::Scalar.floating_accumulate_mask(&mut scalar, &src, rule);
                Backend::Wide.floating_accumulate_mask(&mut wide, &src, rule);
                assert_eq!(scalar, wide, "mask len {len}, {rule:?}");
            }
        }
    }

    #[test]
    fn short_destination_is_untouched() {
        for backend in [Backend::Scalar, Backend::Wide] {
            let mut dst = [9u8; 3];
            backend.fixed_accumulate(&mut dst, &[FIXED_ONE; 4], Op::Src, FillRule::NonZero);
            backend.floating_accumulate(&mut dst, &[1.0; 4], Op::Over, FillRule::NonZero);
            assert_eq!(dst, [9; 3]);
            let mut mask = [9u32; 3];
            backend.fixed_accumulate_mask(&mut mask, &[FIXED_ONE; 4], FillRule::NonZero);
            backend.floating_accumulate_mask(&mut mask, &[1.0; 4], FillRule::NonZero);
            assert_eq!(mask, [9; 3]);
        }
    }

    #[test]
    fn longer_destination_keeps_its_tail() {
        for backend in [Backend::Scalar, Backend::Wide] {
            let mut dst = [9u8; 7];
            let src = [FIXED_ONE, 0, 0, 0, 0u32.wrapping_sub(FIXED_ONE)];
            backend.fixed_accumulate(&mut dst, &src, Op::Src, FillRule::NonZero);
            assert_eq!(dst, [0xff, 0xff, 0xff, 0xff, 0, 9, 9]);
        }
    }

    #[test]
    fn over_never_reduces_alpha() {
        let mut rng = StdRng::seed_from_u64(44);
        let src = random_floating(&mut rng, 64);
        let prior: Vec<u8> = (0..64).map(|_| rng.gen()).collect();
        let mut dst = prior.clone();
        Backend::Wide.floating_accumulate(&mut dst, &src, Op::Over, FillRule::NonZero);
        assert!(dst.iter().zip(&prior).all(|(after, before)| after >= before));
    }

    #[test]
    fn opaque_and_transparent_sources_for_every_destination() {
        // every alpha once, plus a tail off the four lane boundary
        let prior: Vec<u8> = (0..=0xffu8).chain([0x00, 0x7f, 0xff]).collect();
        let len = prior.len();
        let mut fixed_opaque = vec![0u32; len];
        fixed_opaque[0] = FIXED_ONE;
        let mut floating_opaque = vec![0f32; len];
        floating_opaque[0] = 1.0;
        let transparent = vec![0u32; len];
        let opaque = vec![0xffu8; len];
        for backend in [Backend::Scalar, Backend::Wide] {
            for rule in RULES {
                let mut dst = prior.clone();
                backend.fixed_accumulate(&mut dst, &transparent, Op::Over, rule);
                assert_eq!(dst, prior, "{backend:?} {rule:?} fixed over");
                backend.floating_accumulate(&mut dst, &vec![0.0; len], Op::Over, rule);
                assert_eq!(dst, prior, "{backend:?} {rule:?} floating over");

                let mut dst = prior.clone();
                backend.fixed_accumulate(&mut dst, &fixed_opaque, Op::Src, rule);
                assert_eq!(dst, opaque, "{backend:?} {rule:?} fixed src");
                let mut dst = prior.clone();
                backend.floating_accumulate(&mut dst, &floating_opaque, Op::Src, rule);
                assert_eq!(dst, opaque, "{backend:?} {rule:?} floating src");

                let mut dst = prior.clone();
                backend.fixed_accumulate(&mut dst, &fixed_opaque, Op::Over, rule);
                assert_eq!(dst, opaque, "{backend:?} {rule:?} fixed opaque over");
                let mut dst = prior.clone();
                backend.floating_accumulate(&mut dst, &floating_opaque, Op::Over, rule);
                assert_eq!(dst, opaque, "{backend:?} {rule:?} floating opaque over");

                let mut dst = prior.clone();
                backend.fixed_accumulate(&mut dst, &transparent, Op::Src, rule);
                assert!(dst.iter().all(|a| *a == 0), "{backend:?} {rule:?} clear");
            }
        }
    }
}
