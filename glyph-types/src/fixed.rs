//! 26.6 fixed-point numbers.

use core::fmt;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// 32-bit signed fixed point number with 6 bits of fraction.
///
/// The represented value is `bits / 64`. This is the unit for glyph space
/// coordinates, advances and kerning deltas. Arithmetic keeps all six
/// fractional bits; precision is only dropped by the explicit
/// [`floor`](Self::floor), [`ceil`](Self::ceil) and [`round`](Self::round)
/// conversions to whole pixels.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::Pod, bytemuck::Zeroable))]
#[repr(transparent)]
pub struct F26Dot6(i32);

impl F26Dot6 {
    /// Minimum value.
    pub const MIN: Self = Self(i32::MIN);

    /// Maximum value.
    pub const MAX: Self = Self(i32::MAX);

    /// This type's smallest representable value
    pub const EPSILON: Self = Self(1);

    /// Representation of 0.0.
    pub const ZERO: Self = Self(0);

    /// Representation of 1.0.
    pub const ONE: Self = Self(Self::ONE_BITS);

    const FRACT_BITS: u32 = 6;
    const ONE_BITS: i32 = 1 << Self::FRACT_BITS;
    const FRACT_MASK: i32 = Self::ONE_BITS - 1;
    const ROUND: i32 = 1 << (Self::FRACT_BITS - 1);

    /// Creates a value from its raw bits.
    #[inline(always)]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits of the value.
    #[inline(always)]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Creates a value from a whole number of units.
    ///
    /// Values outside of the representable range wrap.
    #[inline(always)]
    pub const fn from_i32(x: i32) -> Self {
        Self(x.wrapping_shl(Self::FRACT_BITS))
    }

    /// Creates a fixed point value from an f32, rounding to the nearest
    /// representable value.
    ///
    /// Out of range values saturate and NaN becomes zero.
    pub fn from_f32(x: f32) -> Self {
        Self((x * Self::ONE_BITS as f32).round() as i32)
    }

    /// Creates a fixed point value from an f64, rounding to the nearest
    /// representable value.
    ///
    /// Out of range values saturate and NaN becomes zero.
    pub fn from_f64(x: f64) -> Self {
        Self((x * Self::ONE_BITS as f64).round() as i32)
    }

    /// Returns the value as an f32.
    ///
    /// Magnitudes above 2^24 units lose precision.
    #[inline(always)]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::ONE_BITS as f32
    }

    /// Returns the value as an f64. This conversion is lossless.
    #[inline(always)]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::ONE_BITS as f64
    }

    /// Returns the greatest whole number less than or equal to the value.
    #[inline(always)]
    pub const fn floor(self) -> i32 {
        self.0 >> Self::FRACT_BITS
    }

    /// Returns the least whole number greater than or equal to the value.
    #[inline(always)]
    pub const fn ceil(self) -> i32 {
        ((self.0 as i64 + Self::FRACT_MASK as i64) >> Self::FRACT_BITS) as i32
    }

    /// Returns the nearest whole number, rounding half way cases up.
    #[inline(always)]
    pub const fn round(self) -> i32 {
        ((self.0 as i64 + Self::ROUND as i64) >> Self::FRACT_BITS) as i32
    }

    /// Returns the fractional part of the number.
    #[inline(always)]
    pub const fn fract(self) -> Self {
        Self(self.0 & Self::FRACT_MASK)
    }

    /// Returns the absolute value of the number.
    pub const fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    /// Multiplies two 26.6 values, rounding the product to the nearest
    /// representable value.
    pub const fn mul(self, other: Self) -> Self {
        let product = self.0 as i64 * other.0 as i64;
        Self(((product + Self::ROUND as i64) >> Self::FRACT_BITS) as i32)
    }

    /// Wrapping addition.
    pub const fn wrapping_add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }

    /// Wrapping subtraction.
    pub const fn wrapping_sub(self, other: Self) -> Self {
        Self(self.0.wrapping_sub(other.0))
    }
}

impl Add for F26Dot6 {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        // same overflow semantics as std: panic in debug, wrap in release
        Self(self.0 + other.0)
    }
}

impl AddAssign for F26Dot6 {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for F26Dot6 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for F26Dot6 {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for F26Dot6 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

// every value converts exactly to f64, so borrow its formatting
impl fmt::Display for F26Dot6 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

impl fmt::Debug for F26Dot6 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}
