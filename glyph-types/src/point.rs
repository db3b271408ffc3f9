use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::F26Dot6;

/// Two dimensional point with a generic coordinate type.
///
/// Glyph space points use [`F26Dot6`] coordinates, pixel space points use
/// `i32` and the rasterizer works on `f32`.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Point<T> {
    /// X coordinate.
    pub x: T,
    /// Y coordinate.
    pub y: T,
}

impl<T> Point<T> {
    /// Creates a new point with the given x and y coordinates.
    #[inline(always)]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Maps `Point<T>` to `Point<U>` by applying a function to each coordinate.
    #[inline(always)]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Point<U> {
        Point {
            x: f(self.x),
            y: f(self.y),
        }
    }
}

impl Point<F26Dot6> {
    /// Point at the origin.
    pub const ZERO: Self = Self::new(F26Dot6::ZERO, F26Dot6::ZERO);

    /// Returns the pixel containing this point.
    pub const fn floor(self) -> Point<i32> {
        Point::new(self.x.floor(), self.y.floor())
    }

    /// Returns the nearest pixel corner to this point.
    pub const fn ceil(self) -> Point<i32> {
        Point::new(self.x.ceil(), self.y.ceil())
    }

    /// Converts to floating point pixel coordinates.
    pub fn to_f32(self) -> Point<f32> {
        self.map(F26Dot6::to_f32)
    }
}

impl Point<f32> {
    /// Linear interpolation between `self` (at `t == 0`) and `other`
    /// (at `t == 1`).
    ///
    /// Written as separate multiply and add steps so the result does not
    /// depend on whether the target fuses them.
    #[inline(always)]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let s = 1.0 - t;
        Self::new(s * self.x + t * other.x, s * self.y + t * other.y)
    }
}

impl<T> Add for Point<T>
where
    T: Add<Output = T>,
{
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T> AddAssign for Point<T>
where
    T: AddAssign,
{
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl<T> Sub for Point<T>
where
    T: Sub<Output = T>,
{
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<T> SubAssign for Point<T>
where
    T: SubAssign,
{
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl<T> Mul<T> for Point<T>
where
    T: Mul<Output = T> + Copy,
{
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: T) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl<T> Neg for Point<T>
where
    T: Neg<Output = T>,
{
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}
