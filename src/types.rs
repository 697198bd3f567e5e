//! Value types shared by every coordinate frame.
//!
//! - [`Coordinate`] is a 3D point that usually only cares about x/y
//! - [`Dimension`] is the derived width/height/orientation view of two corners
//! - [`Viewport`] is the pixel grid size a window is rendered onto

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use glam::{DVec2, DVec3};

use crate::tolerance::Tolerance;

/// A point in world, window or viewport space.
///
/// `z` carries elevation when a source has it; most frame math ignores it and
/// uses [`Coordinate::is_equal_2d`]. Equality through `==` uses
/// [`Tolerance::DEFAULT`] on all three components.
#[derive(Clone, Copy, Debug, Default)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Coordinate { x, y, z: 0.0 }
    }

    #[inline]
    pub const fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Coordinate { x, y, z }
    }

    /// Equality on all three components.
    pub fn is_equal(&self, other: &Coordinate) -> bool {
        self.is_equal_with(other, Tolerance::DEFAULT)
    }

    /// Equality ignoring elevation.
    pub fn is_equal_2d(&self, other: &Coordinate) -> bool {
        self.is_equal_2d_with(other, Tolerance::DEFAULT)
    }

    pub fn is_equal_with(&self, other: &Coordinate, tol: Tolerance) -> bool {
        self.is_equal_2d_with(other, tol) && tol.close(self.z, other.z)
    }

    pub fn is_equal_2d_with(&self, other: &Coordinate, tol: Tolerance) -> bool {
        tol.close(self.x, other.x) && tol.close(self.y, other.y)
    }

    /// Halfway point; elevation is averaged as well.
    pub fn midpoint(self, other: Coordinate) -> Coordinate {
        Coordinate {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            z: (self.z + other.z) / 2.0,
        }
    }

    #[inline]
    pub fn xy(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Replace x/y, keeping this coordinate's elevation.
    #[inline]
    pub fn with_xy(self, xy: DVec2) -> Coordinate {
        Coordinate { x: xy.x, y: xy.y, z: self.z }
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl From<DVec2> for Coordinate {
    fn from(v: DVec2) -> Self {
        Coordinate::new(v.x, v.y)
    }
}

impl From<DVec3> for Coordinate {
    fn from(v: DVec3) -> Self {
        Coordinate::new_3d(v.x, v.y, v.z)
    }
}

impl From<Coordinate> for DVec3 {
    fn from(c: Coordinate) -> Self {
        DVec3::new(c.x, c.y, c.z)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Coordinate::new(x, y)
    }
}

impl Add for Coordinate {
    type Output = Coordinate;
    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new_3d(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;
    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new_3d(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Coordinate {
    type Output = Coordinate;
    fn mul(self, rhs: f64) -> Coordinate {
        Coordinate::new_3d(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Coordinate {
    type Output = Coordinate;
    fn neg(self) -> Coordinate {
        Coordinate::new_3d(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Direction of one axis of a box, from its upper-left to its lower-right corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

impl Sign {
    /// Sign of travelling from `from` to `to`. Zero-length axes are positive.
    #[inline]
    pub fn between(from: f64, to: f64) -> Sign {
        if to < from { Sign::Negative } else { Sign::Positive }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }

    #[inline]
    pub fn as_i8(self) -> i8 {
        match self {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self == Sign::Positive
    }
}

impl Neg for Sign {
    type Output = Sign;
    fn neg(self) -> Sign {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

/// Width, height and per-axis orientation derived from two corners.
///
/// A `Dimension` is only ever computed from a corner pair and never keeps the
/// corners themselves. Recompute it after the originating box changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimension {
    width: f64,
    height: f64,
    sign_x: Sign,
    sign_y: Sign,
}

impl Dimension {
    pub fn new(ul: Coordinate, lr: Coordinate) -> Self {
        Dimension {
            width: (lr.x - ul.x).abs(),
            height: (lr.y - ul.y).abs(),
            sign_x: Sign::between(ul.x, lr.x),
            sign_y: Sign::between(ul.y, lr.y),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn sign_x(&self) -> Sign {
        self.sign_x
    }

    #[inline]
    pub fn sign_y(&self) -> Sign {
        self.sign_y
    }

    /// Width with its orientation applied.
    #[inline]
    pub fn signed_width(&self) -> f64 {
        self.width * self.sign_x.as_f64()
    }

    /// Height with its orientation applied.
    #[inline]
    pub fn signed_height(&self) -> f64 {
        self.height * self.sign_y.as_f64()
    }

    /// Width over height, or `None` for a zero height.
    pub fn aspect(&self) -> Option<f64> {
        if self.height == 0.0 {
            None
        } else {
            Some(self.width / self.height)
        }
    }

    /// Whether either extent is zero under the default tolerance.
    pub fn is_empty(&self) -> bool {
        Tolerance::DEFAULT.is_zero(self.width) || Tolerance::DEFAULT.is_zero(self.height)
    }

    /// Same orientation on both axes.
    pub fn same_orientation(&self, other: &Dimension) -> bool {
        self.sign_x == other.sign_x && self.sign_y == other.sign_y
    }
}

/// Size of the pixel grid a window is rendered onto.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const EMPTY: Viewport = Viewport { width: 0, height: 0 };

    pub const fn new(width: u32, height: u32) -> Self {
        Viewport { width, height }
    }

    /// Either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, or `None` for an empty viewport.
    pub fn aspect(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(f64::from(self.width) / f64::from(self.height))
        }
    }

    /// The pixel corner opposite the origin.
    pub fn lower_right(&self) -> Coordinate {
        Coordinate::new(f64::from(self.width), f64::from(self.height))
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Coordinate tests ====================

    #[test]
    fn coordinate_equality_uses_tolerance() {
        let a = Coordinate::new(0.1 + 0.2, 1.0);
        let b = Coordinate::new(0.3, 1.0);
        assert!(a.is_equal(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn coordinate_2d_equality_ignores_elevation() {
        let a = Coordinate::new_3d(1.0, 2.0, 10.0);
        let b = Coordinate::new_3d(1.0, 2.0, -5.0);
        assert!(a.is_equal_2d(&b));
        assert!(!a.is_equal(&b));
    }

    #[test]
    fn coordinate_arithmetic() {
        let a = Coordinate::new(3.0, 4.0);
        let b = Coordinate::new(1.0, 2.0);
        assert_eq!(a + b, Coordinate::new(4.0, 6.0));
        assert_eq!(a - b, Coordinate::new(2.0, 2.0));
        assert_eq!(a * 2.0, Coordinate::new(6.0, 8.0));
        assert_eq!(-a, Coordinate::new(-3.0, -4.0));
        assert_eq!(a.midpoint(b), Coordinate::new(2.0, 3.0));
    }

    #[test]
    fn coordinate_glam_conversion_keeps_elevation() {
        let c = Coordinate::new_3d(1.0, 2.0, 3.0);
        let moved = c.with_xy(c.xy() * 2.0);
        assert_eq!(moved, Coordinate::new_3d(2.0, 4.0, 3.0));
        assert_eq!(DVec3::from(c), DVec3::new(1.0, 2.0, 3.0));
    }

    // ==================== Dimension tests ====================

    #[test]
    fn dimension_positive_axes() {
        let d = Dimension::new(Coordinate::new(0.0, 0.0), Coordinate::new(4.0, 3.0));
        assert_eq!(d.width(), 4.0);
        assert_eq!(d.height(), 3.0);
        assert_eq!(d.sign_x(), Sign::Positive);
        assert_eq!(d.sign_y(), Sign::Positive);
    }

    #[test]
    fn dimension_north_up_box_has_negative_y() {
        let d = Dimension::new(Coordinate::new(-10.0, 50.0), Coordinate::new(10.0, 40.0));
        assert_eq!(d.width(), 20.0);
        assert_eq!(d.height(), 10.0);
        assert_eq!(d.sign_x(), Sign::Positive);
        assert_eq!(d.sign_y(), Sign::Negative);
        assert_eq!(d.signed_height(), -10.0);
    }

    #[test]
    fn dimension_zero_length_axis_is_positive() {
        let d = Dimension::new(Coordinate::new(5.0, 5.0), Coordinate::new(5.0, 1.0));
        assert_eq!(d.sign_x(), Sign::Positive);
        assert_eq!(d.sign_y(), Sign::Negative);
        assert!(d.is_empty());
        assert_eq!(d.aspect(), Some(0.0));
    }

    #[test]
    fn dimension_aspect() {
        let d = Dimension::new(Coordinate::new(0.0, 10.0), Coordinate::new(20.0, 0.0));
        assert_eq!(d.aspect(), Some(2.0));
        let flat = Dimension::new(Coordinate::new(0.0, 0.0), Coordinate::new(20.0, 0.0));
        assert_eq!(flat.aspect(), None);
    }

    // ==================== Sign / Viewport tests ====================

    #[test]
    fn sign_negation_and_values() {
        assert_eq!(-Sign::Positive, Sign::Negative);
        assert_eq!(Sign::Negative.as_f64(), -1.0);
        assert_eq!(Sign::Positive.as_i8(), 1);
    }

    #[test]
    fn viewport_aspect() {
        assert_eq!(Viewport::new(200, 100).aspect(), Some(2.0));
        assert_eq!(Viewport::new(200, 0).aspect(), None);
        assert!(Viewport::EMPTY.is_empty());
        assert_eq!(Viewport::new(4, 3).lower_right(), Coordinate::new(4.0, 3.0));
    }
}
