//! Oriented axis-aligned boxes.
//!
//! A [`Subset`] is defined by an upper-left and a lower-right corner, but
//! nothing forces `ul` to be numerically smaller than `lr`. A north-up world
//! window has `ul.y > lr.y`, a viewport has `ul.y < lr.y`. The orientation of
//! each axis is always recovered through [`Dimension`] and every operation
//! here respects it.

use std::fmt;
use std::ops::{Add, Sub};

use crate::tolerance::Tolerance;
use crate::types::{Coordinate, Dimension, Sign};

/// Box in some coordinate system, with explicit per-axis orientation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Subset {
    pub ul: Coordinate,
    pub lr: Coordinate,
}

impl Subset {
    /// Both corners at the origin. Marks "not computed" and "no overlap".
    pub const DEGENERATE: Subset = Subset {
        ul: Coordinate::ORIGIN,
        lr: Coordinate::ORIGIN,
    };

    pub const fn new(ulx: f64, uly: f64, lrx: f64, lry: f64) -> Self {
        Subset {
            ul: Coordinate::new(ulx, uly),
            lr: Coordinate::new(lrx, lry),
        }
    }

    pub const fn from_corners(ul: Coordinate, lr: Coordinate) -> Self {
        Subset { ul, lr }
    }

    /// Box of `dimension`'s size and orientation centred on `center`.
    pub fn from_center(center: Coordinate, dimension: Dimension) -> Self {
        let half = Coordinate::new(dimension.signed_width() / 2.0, dimension.signed_height() / 2.0);
        Subset {
            ul: center - half,
            lr: center + half,
        }
    }

    /// Anything but the [`Subset::DEGENERATE`] sentinel.
    pub fn is_valid(&self) -> bool {
        !(self.ul.is_equal_2d(&Coordinate::ORIGIN) && self.lr.is_equal_2d(&Coordinate::ORIGIN))
    }

    /// Zero width or zero height.
    pub fn is_degenerate(&self) -> bool {
        self.dimension().is_empty()
    }

    #[inline]
    pub fn dimension(&self) -> Dimension {
        Dimension::new(self.ul, self.lr)
    }

    pub fn center(&self) -> Coordinate {
        self.ul.midpoint(self.lr)
    }

    /// Upper-right corner.
    pub fn ur(&self) -> Coordinate {
        Coordinate::new(self.lr.x, self.ul.y)
    }

    /// Lower-left corner.
    pub fn ll(&self) -> Coordinate {
        Coordinate::new(self.ul.x, self.lr.y)
    }

    /// All four corners, clockwise from upper-left.
    pub fn corners(&self) -> [Coordinate; 4] {
        [self.ul, self.ur(), self.lr, self.ll()]
    }

    /// Whether `p` lies between the corners on both axes, boundary included.
    pub fn is_inside(&self, p: Coordinate) -> bool {
        let dim = self.dimension();
        axis_contains(self.ul.x, self.lr.x, dim.sign_x(), p.x)
            && axis_contains(self.ul.y, self.lr.y, dim.sign_y(), p.y)
    }

    /// `p` itself when inside, otherwise `p` clamped onto the box per axis.
    pub fn nearest_point(&self, p: Coordinate) -> Coordinate {
        if self.is_inside(p) {
            return p;
        }
        let dim = self.dimension();
        Coordinate::new_3d(
            axis_clamp(self.ul.x, self.lr.x, dim.sign_x(), p.x),
            axis_clamp(self.ul.y, self.lr.y, dim.sign_y(), p.y),
            p.z,
        )
    }

    /// Overlap of two boxes with the same orientation.
    ///
    /// Returns [`Subset::DEGENERATE`] when orientations differ, when the boxes
    /// are disjoint, and when they only touch along an edge or at a corner.
    pub fn intersect(&self, other: &Subset) -> Subset {
        let dim = self.dimension();
        if !dim.same_orientation(&other.dimension()) {
            return Subset::DEGENERATE;
        }

        let (ulx, lrx) = axis_overlap(self.ul.x, self.lr.x, other.ul.x, other.lr.x, dim.sign_x());
        let (uly, lry) = axis_overlap(self.ul.y, self.lr.y, other.ul.y, other.lr.y, dim.sign_y());
        let result = Subset::new(ulx, uly, lrx, lry);

        // A flipped or collapsed axis means the ranges never overlapped.
        let tol = Tolerance::DEFAULT;
        let extent_x = (lrx - ulx) * dim.sign_x().as_f64();
        let extent_y = (lry - uly) * dim.sign_y().as_f64();
        if extent_x < 0.0 || extent_y < 0.0 || tol.is_zero(extent_x) || tol.is_zero(extent_y) {
            return Subset::DEGENERATE;
        }
        result
    }

    /// Smallest box containing both, oriented like `self`.
    pub fn join(&self, other: &Subset) -> Subset {
        if !self.is_valid() {
            return *other;
        }
        if !other.is_valid() {
            return *self;
        }
        let dim = self.dimension();
        let (ulx, lrx) = axis_union(self.ul.x, self.lr.x, other.ul.x, other.lr.x, dim.sign_x());
        let (uly, lry) = axis_union(self.ul.y, self.lr.y, other.ul.y, other.lr.y, dim.sign_y());
        Subset::new(ulx, uly, lrx, lry)
    }

    /// Shift both corners by `by`.
    pub fn offset(&self, by: Coordinate) -> Subset {
        Subset {
            ul: self.ul + by,
            lr: self.lr + by,
        }
    }

    /// Express this box relative to `origin`.
    pub fn relative_to(&self, origin: Coordinate) -> Subset {
        self.offset(-origin)
    }

    /// The same box with corners swapped so its axes run in the given
    /// directions.
    pub fn oriented(&self, sign_x: Sign, sign_y: Sign) -> Subset {
        let dim = self.dimension();
        let (ulx, lrx) = if dim.sign_x() == sign_x {
            (self.ul.x, self.lr.x)
        } else {
            (self.lr.x, self.ul.x)
        };
        let (uly, lry) = if dim.sign_y() == sign_y {
            (self.ul.y, self.lr.y)
        } else {
            (self.lr.y, self.ul.y)
        };
        Subset {
            ul: Coordinate::new_3d(ulx, uly, self.ul.z),
            lr: Coordinate::new_3d(lrx, lry, self.lr.z),
        }
    }

    /// Grow outward by `buffer` on every side, whatever the orientation.
    /// Negative buffers shrink.
    pub fn buffered(&self, buffer: f64) -> Subset {
        let dim = self.dimension();
        let delta = Coordinate::new(dim.sign_x().as_f64() * buffer, dim.sign_y().as_f64() * buffer);
        Subset {
            ul: self.ul - delta,
            lr: self.lr + delta,
        }
    }
}

/// Corner-wise equality under the default tolerance, elevation included.
impl PartialEq for Subset {
    fn eq(&self, other: &Self) -> bool {
        self.ul.is_equal(&other.ul) && self.lr.is_equal(&other.lr)
    }
}

/// Grow by a buffer.
impl Add<f64> for Subset {
    type Output = Subset;
    fn add(self, rhs: f64) -> Subset {
        self.buffered(rhs)
    }
}

/// Shrink by a buffer.
impl Sub<f64> for Subset {
    type Output = Subset;
    fn sub(self, rhs: f64) -> Subset {
        self.buffered(-rhs)
    }
}

/// Shift by a signed extent, e.g. one window-width to the side.
impl Add<Dimension> for Subset {
    type Output = Subset;
    fn add(self, rhs: Dimension) -> Subset {
        self.offset(Coordinate::new(rhs.signed_width(), rhs.signed_height()))
    }
}

impl Sub<Dimension> for Subset {
    type Output = Subset;
    fn sub(self, rhs: Dimension) -> Subset {
        self.offset(Coordinate::new(-rhs.signed_width(), -rhs.signed_height()))
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({}, {}) -> ({}, {})]",
            self.ul.x, self.ul.y, self.lr.x, self.lr.y
        )
    }
}

fn axis_contains(ul: f64, lr: f64, sign: Sign, v: f64) -> bool {
    match sign {
        Sign::Positive => ul <= v && v <= lr,
        Sign::Negative => lr <= v && v <= ul,
    }
}

fn axis_clamp(ul: f64, lr: f64, sign: Sign, v: f64) -> f64 {
    match sign {
        Sign::Positive => v.clamp(ul, lr),
        Sign::Negative => v.clamp(lr, ul),
    }
}

/// Overlapping range along one axis, in the given orientation. May come out
/// flipped when the ranges are disjoint.
fn axis_overlap(a_ul: f64, a_lr: f64, b_ul: f64, b_lr: f64, sign: Sign) -> (f64, f64) {
    match sign {
        Sign::Positive => (a_ul.max(b_ul), a_lr.min(b_lr)),
        Sign::Negative => (a_ul.min(b_ul), a_lr.max(b_lr)),
    }
}

/// Covering range along one axis. `b` may be oriented either way.
fn axis_union(a_ul: f64, a_lr: f64, b_ul: f64, b_lr: f64, sign: Sign) -> (f64, f64) {
    let (b_min, b_max) = (b_ul.min(b_lr), b_ul.max(b_lr));
    match sign {
        Sign::Positive => (a_ul.min(b_min), a_lr.max(b_max)),
        Sign::Negative => (a_ul.max(b_max), a_lr.min(b_min)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn north_up(ulx: f64, uly: f64, lrx: f64, lry: f64) -> Subset {
        let s = Subset::new(ulx, uly, lrx, lry);
        assert_eq!(s.dimension().sign_y(), Sign::Negative);
        s
    }

    // ==================== Validity ====================

    #[test]
    fn sentinel_is_invalid() {
        assert!(!Subset::DEGENERATE.is_valid());
        assert!(Subset::new(0.0, 0.0, 1.0, 1.0).is_valid());
        // A collapsed box away from the origin is valid but degenerate
        let line = Subset::new(1.0, 1.0, 5.0, 1.0);
        assert!(line.is_valid());
        assert!(line.is_degenerate());
    }

    #[test]
    fn corners_and_center() {
        let s = north_up(0.0, 10.0, 20.0, 0.0);
        assert_eq!(s.center(), Coordinate::new(10.0, 5.0));
        assert_eq!(s.ur(), Coordinate::new(20.0, 10.0));
        assert_eq!(s.ll(), Coordinate::new(0.0, 0.0));
        assert_eq!(s.corners().len(), 4);
    }

    // ==================== Containment ====================

    #[test]
    fn is_inside_respects_orientation() {
        let pixels = Subset::new(0.0, 0.0, 100.0, 50.0);
        let world = north_up(0.0, 50.0, 100.0, 0.0);
        let p = Coordinate::new(10.0, 20.0);
        assert!(pixels.is_inside(p));
        assert!(world.is_inside(p));

        let reversed_x = Subset::new(100.0, 0.0, 0.0, 50.0);
        assert!(reversed_x.is_inside(p));
        assert!(!reversed_x.is_inside(Coordinate::new(-1.0, 20.0)));
    }

    #[test]
    fn boundary_points_are_inside() {
        let world = north_up(0.0, 50.0, 100.0, 0.0);
        for corner in world.corners() {
            assert!(world.is_inside(corner));
        }
    }

    #[test]
    fn nearest_point_clamps_each_axis() {
        let world = north_up(0.0, 50.0, 100.0, 0.0);
        assert_eq!(
            world.nearest_point(Coordinate::new(150.0, 25.0)),
            Coordinate::new(100.0, 25.0)
        );
        assert_eq!(
            world.nearest_point(Coordinate::new(-10.0, 80.0)),
            Coordinate::new(0.0, 50.0)
        );
        let inside = Coordinate::new_3d(5.0, 5.0, 7.0);
        assert_eq!(world.nearest_point(inside), inside);
    }

    // ==================== Intersection ====================

    #[test]
    fn intersect_overlapping_north_up() {
        let a = north_up(0.0, 100.0, 60.0, 0.0);
        let b = north_up(40.0, 80.0, 100.0, -20.0);
        let i = a.intersect(&b);
        assert_eq!(i, Subset::new(40.0, 80.0, 60.0, 0.0));
        assert!(a.is_inside(i.ul) && a.is_inside(i.lr));
        assert!(b.is_inside(i.ul) && b.is_inside(i.lr));
    }

    #[test]
    fn intersect_is_symmetric() {
        let a = Subset::new(0.0, 0.0, 10.0, 10.0);
        let b = Subset::new(5.0, 5.0, 15.0, 15.0);
        assert_eq!(a.intersect(&b), b.intersect(&a));
        assert_eq!(a.intersect(&b), Subset::new(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn intersect_disjoint_is_sentinel() {
        let a = Subset::new(0.0, 0.0, 10.0, 10.0);
        let b = Subset::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.intersect(&b), Subset::DEGENERATE);

        let c = north_up(0.0, 10.0, 10.0, 0.0);
        let d = north_up(0.0, 30.0, 10.0, 20.0);
        assert_eq!(c.intersect(&d), Subset::DEGENERATE);
    }

    #[test]
    fn intersect_mixed_orientation_is_sentinel() {
        let a = Subset::new(0.0, 0.0, 10.0, 10.0);
        let b = north_up(0.0, 10.0, 10.0, 0.0);
        assert_eq!(a.intersect(&b), Subset::DEGENERATE);
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Subset::new(0.0, 0.0, 10.0, 10.0);
        let b = Subset::new(10.0, 0.0, 20.0, 10.0);
        assert_eq!(a.intersect(&b), Subset::DEGENERATE);

        let c = north_up(0.0, 10.0, 10.0, 0.0);
        let d = north_up(0.0, 20.0, 10.0, 10.0);
        assert_eq!(c.intersect(&d), Subset::DEGENERATE);
    }

    // ==================== Join ====================

    #[test]
    fn join_keeps_first_orientation() {
        let a = north_up(0.0, 10.0, 10.0, 0.0);
        let b = Subset::new(5.0, -5.0, 20.0, 5.0);
        let j = a.join(&b);
        assert_eq!(j, Subset::new(0.0, 10.0, 20.0, -5.0));
        assert_eq!(j.dimension().sign_y(), Sign::Negative);
    }

    #[test]
    fn join_with_sentinel_returns_other() {
        let a = Subset::new(1.0, 1.0, 2.0, 2.0);
        assert_eq!(Subset::DEGENERATE.join(&a), a);
        assert_eq!(a.join(&Subset::DEGENERATE), a);
    }

    // ==================== Translation ====================

    #[test]
    fn buffer_grows_outward_in_both_orientations() {
        let pixels = Subset::new(0.0, 0.0, 10.0, 10.0) + 1.0;
        assert_eq!(pixels, Subset::new(-1.0, -1.0, 11.0, 11.0));

        let world = north_up(0.0, 10.0, 10.0, 0.0) + 1.0;
        assert_eq!(world, Subset::new(-1.0, 11.0, 11.0, -1.0));

        let shrunk = world - 2.0;
        assert_eq!(shrunk, Subset::new(1.0, 9.0, 9.0, 1.0));
    }

    #[test]
    fn dimension_shift_moves_one_box_over() {
        let world = north_up(0.0, 10.0, 20.0, 0.0);
        let next = world + world.dimension();
        assert_eq!(next, Subset::new(20.0, 0.0, 40.0, -10.0));
        assert_eq!(next - world.dimension(), world);
    }

    #[test]
    fn relative_to_origin() {
        let s = Subset::new(10.0, 20.0, 30.0, 40.0);
        let rel = s.relative_to(Coordinate::new(10.0, 20.0));
        assert_eq!(rel, Subset::new(0.0, 0.0, 20.0, 20.0));
    }

    #[test]
    fn oriented_swaps_only_mismatched_axes() {
        let s = north_up(0.0, 10.0, 20.0, 0.0);
        assert_eq!(s.oriented(Sign::Positive, Sign::Negative), s);
        assert_eq!(s.oriented(Sign::Positive, Sign::Positive), Subset::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(s.oriented(Sign::Negative, Sign::Positive), Subset::new(20.0, 0.0, 0.0, 10.0));
    }

    #[test]
    fn from_center_preserves_orientation() {
        let world = north_up(0.0, 10.0, 20.0, 0.0);
        let moved = Subset::from_center(Coordinate::new(50.0, 50.0), world.dimension());
        assert_eq!(moved, Subset::new(40.0, 55.0, 60.0, 45.0));
        assert!(moved.dimension().same_orientation(&world.dimension()));
    }
}
