//! Path commands and the interface for consuming them.

use crate::{F26Dot6, Point};

/// Interface for accepting a sequence of path commands in pixel space.
///
/// Coordinates are `f32` pixels in a y-down coordinate system.
pub trait OutlinePen {
    /// Emit a command to begin a new subpath at (x, y).
    fn move_to(&mut self, x: f32, y: f32);

    /// Emit a line segment from the current point to (x, y).
    fn line_to(&mut self, x: f32, y: f32);

    /// Emit a quadratic bezier segment from the current point with a control
    /// point at (cx0, cy0) and ending at (x, y).
    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32);

    /// Emit a cubic bezier segment from the current point with control
    /// points at (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32);

    /// Emit a command to close the current subpath.
    fn close(&mut self);
}

/// Single element of a glyph outline in 26.6 glyph space.
///
/// Each contour of an outline begins with [`MoveTo`](Self::MoveTo). An
/// outline may hold several contours.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
// clippy doesn't like the common To suffix
#[allow(clippy::enum_variant_names)]
pub enum PathCommand {
    /// Begin a new contour at the point.
    MoveTo(Point<F26Dot6>),
    /// Line from the current point to the given point.
    LineTo(Point<F26Dot6>),
    /// Quadratic bezier with one control point.
    QuadTo(Point<F26Dot6>, Point<F26Dot6>),
    /// Cubic bezier with two control points.
    CubicTo(Point<F26Dot6>, Point<F26Dot6>, Point<F26Dot6>),
}

impl PathCommand {
    /// Returns the point where this command leaves the pen.
    pub fn end_point(&self) -> Point<F26Dot6> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) | Self::QuadTo(_, p) | Self::CubicTo(_, _, p) => p,
        }
    }

    /// Feeds the command to a pen, converting to `f32` pixels and adding
    /// `origin` to every point.
    pub fn apply(&self, origin: Point<f32>, pen: &mut impl OutlinePen) {
        let at = |p: Point<F26Dot6>| origin + p.to_f32();
        match *self {
            Self::MoveTo(p) => {
                let p = at(p);
                pen.move_to(p.x, p.y);
            }
            Self::LineTo(p) => {
                let p = at(p);
                pen.line_to(p.x, p.y);
            }
            Self::QuadTo(c0, p) => {
                let (c0, p) = (at(c0), at(p));
                pen.quad_to(c0.x, c0.y, p.x, p.y);
            }
            Self::CubicTo(c0, c1, p) => {
                let (c0, c1, p) = (at(c0), at(c1), at(p));
                pen.curve_to(c0.x, c0.y, c1.x, c1.y, p.x, p.y);
            }
        }
    }
}
