//! Rectangles in glyph space and pixel space.

use crate::{F26Dot6, Point};

/// Rectangle in 26.6 glyph space.
///
/// Glyph space is y-down: `min` is the top-left corner and `max` the
/// bottom-right corner. A rectangle is empty when `min` is not strictly
/// less than `max` on both axes.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Top-left corner.
    pub min: Point<F26Dot6>,
    /// Bottom-right corner.
    pub max: Point<F26Dot6>,
}

impl Rect {
    /// Creates a new rectangle from its corners.
    pub const fn new(min: Point<F26Dot6>, max: Point<F26Dot6>) -> Self {
        Self { min, max }
    }

    /// Returns true if the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Returns the smallest pixel rectangle that contains this one.
    ///
    /// The minimum corner is floored and the maximum corner is ceiled.
    pub const fn pixel_bounds(&self) -> IntRect {
        let min = self.min.floor();
        let max = self.max.ceil();
        IntRect::new(min.x, min.y, max.x, max.y)
    }

    /// Returns the rectangle translated by the given offset.
    pub fn translate(&self, offset: Point<F26Dot6>) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Returns the smallest rectangle containing both rectangles.
    ///
    /// Empty rectangles contribute nothing.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self::new(
            Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        )
    }
}

/// Rectangle in pixel space with an exclusive maximum corner.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntRect {
    /// Left edge.
    pub x0: i32,
    /// Top edge.
    pub y0: i32,
    /// Right edge (exclusive).
    pub x1: i32,
    /// Bottom edge (exclusive).
    pub y1: i32,
}

impl IntRect {
    /// Creates a new rectangle from its edges.
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Creates a rectangle with its top-left corner at the origin.
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Returns the top-left corner.
    pub const fn min(&self) -> Point<i32> {
        Point::new(self.x0, self.y0)
    }

    /// Returns the width, or zero for inverted rectangles.
    pub const fn width(&self) -> i32 {
        let width = self.x1.saturating_sub(self.x0);
        if width > 0 {
            width
        } else {
            0
        }
    }

    /// Returns the height, or zero for inverted rectangles.
    pub const fn height(&self) -> i32 {
        let height = self.y1.saturating_sub(self.y0);
        if height > 0 {
            height
        } else {
            0
        }
    }

    /// Returns true if the rectangle contains no pixels.
    pub const fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Returns true if the pixel at (x, y) is inside the rectangle.
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Returns the rectangle translated by the given offset.
    pub const fn translate(&self, offset: Point<i32>) -> Self {
        Self::new(
            self.x0 + offset.x,
            self.y0 + offset.y,
            self.x1 + offset.x,
            self.y1 + offset.y,
        )
    }

    /// Returns the overlap of two rectangles.
    ///
    /// The result may be empty, in which case its edges are not
    /// meaningful beyond [`is_empty`](Self::is_empty).
    pub fn intersect(&self, other: &Self) -> Self {
        Self::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        )
    }
}
