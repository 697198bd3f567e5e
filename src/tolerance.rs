//! Floating-point comparison with a combined absolute and relative epsilon.
//!
//! Every degeneracy and change check in the crate goes through [`Tolerance`]
//! instead of `==`, so representational noise (e.g. `0.1 + 0.2`) never reads
//! as a changed window or a new world extent.

/// Absolute + relative epsilon pair.
///
/// Two values are equal when their difference is within `absolute`, or within
/// `relative` times the larger magnitude. The absolute term handles values
/// near zero where a relative bound collapses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    pub absolute: f64,
    pub relative: f64,
}

impl Tolerance {
    pub const DEFAULT: Tolerance = Tolerance {
        absolute: 1e-9,
        relative: 1e-9,
    };

    pub const fn new(absolute: f64, relative: f64) -> Self {
        Tolerance { absolute, relative }
    }

    #[inline]
    pub fn close(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        let diff = (a - b).abs();
        if diff <= self.absolute {
            return true;
        }
        diff <= self.relative * a.abs().max(b.abs())
    }

    #[inline]
    pub fn is_zero(&self, a: f64) -> bool {
        self.close(a, 0.0)
    }

    /// Whether `a` vanishes next to `scale`, using the relative term only.
    ///
    /// For quantities whose unit depends on the data, such as a determinant
    /// built from pixel sizes, where no absolute epsilon fits every scale.
    #[inline]
    pub fn negligible(&self, a: f64, scale: f64) -> bool {
        a.abs() <= self.relative * scale.abs()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::DEFAULT
    }
}

/// Compare with [`Tolerance::DEFAULT`].
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    Tolerance::DEFAULT.close(a, b)
}
