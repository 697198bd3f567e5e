//! Invertible 2D affine model between raster (pixel/line) and world space.
//!
//! Coefficients follow the geotransform layout:
//!
//! ```text
//! x' = a0 + a1*x + a2*y
//! y' = a3 + a4*x + a5*y
//! ```
//!
//! The inverse is derived algebraically once at construction and kept next to
//! the forward vector, so both directions cost the same.

mod text;

use std::fmt;
use std::str::FromStr;

use glam::DAffine2;

use crate::errors::{AffineError, TextError};
use crate::log::debug;
use crate::subset::Subset;
use crate::tolerance::{Tolerance, approx_eq};
use crate::types::{Coordinate, Sign};

pub use text::TEXT_PRECISION;

/// Six affine coefficients, `[a0, a1, a2, a3, a4, a5]`.
pub type Coefficients = [f64; 6];

/// Forward and inverse affine coefficient vectors.
///
/// A model can be built "inverted": the declared coefficients then describe
/// the inverse direction and [`AffineModel::transform`] applies their inverse.
/// The flag is fixed at construction and survives the text round-trip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineModel {
    forward: Coefficients,
    inverse: Coefficients,
    inverted: bool,
}

impl AffineModel {
    /// Build from explicit coefficients.
    pub fn new(coefficients: Coefficients, inverse: bool) -> Result<Self, AffineError> {
        let derived = invert(&coefficients)?;
        let model = if inverse {
            AffineModel {
                forward: derived,
                inverse: coefficients,
                inverted: true,
            }
        } else {
            AffineModel {
                forward: coefficients,
                inverse: derived,
                inverted: false,
            }
        };
        Ok(model)
    }

    /// Scale + offset model mapping the `input` corners onto the `output`
    /// corners. No rotation or shear.
    pub fn from_corners(
        in_ul: Coordinate,
        in_lr: Coordinate,
        out_ul: Coordinate,
        out_lr: Coordinate,
    ) -> Result<Self, AffineError> {
        if approx_eq(in_ul.x, in_lr.x) {
            return Err(AffineError::DegenerateCorners { axis: 'x' });
        }
        if approx_eq(in_ul.y, in_lr.y) {
            return Err(AffineError::DegenerateCorners { axis: 'y' });
        }
        let scale_x = (out_lr.x - out_ul.x) / (in_lr.x - in_ul.x);
        let scale_y = (out_lr.y - out_ul.y) / (in_lr.y - in_ul.y);
        let offset_x = out_ul.x - scale_x * in_ul.x;
        let offset_y = out_ul.y - scale_y * in_ul.y;
        AffineModel::new([offset_x, scale_x, 0.0, offset_y, 0.0, scale_y], false)
    }

    /// Model mapping `input` onto `output`, corner to corner.
    pub fn between(input: &Subset, output: &Subset) -> Result<Self, AffineError> {
        AffineModel::from_corners(input.ul, input.lr, output.ul, output.lr)
    }

    /// Decode the textual parameter block. Each `INVERSE_MT` wrapper and the
    /// `inverse` argument toggle the direction once.
    pub fn from_text(text: &str, inverse: bool) -> Result<Self, TextError> {
        let (coefficients, wrapped_inverse) = text::parse(text)?;
        debug!(?coefficients, wrapped_inverse, inverse, "decoded affine text");
        Ok(AffineModel::new(coefficients, wrapped_inverse != inverse)?)
    }

    /// Encode as a textual parameter block.
    pub fn to_text(&self) -> String {
        if self.inverted {
            text::write_inverse(&self.inverse)
        } else {
            text::write(&self.forward)
        }
    }

    /// Raster → world coefficients.
    pub fn coefficients(&self) -> Coefficients {
        self.forward
    }

    /// World → raster coefficients.
    pub fn inverse_coefficients(&self) -> Coefficients {
        self.inverse
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Same model with the two directions swapped.
    pub fn inverted(&self) -> AffineModel {
        AffineModel {
            forward: self.inverse,
            inverse: self.forward,
            inverted: !self.inverted,
        }
    }

    pub fn transform(&self, p: Coordinate) -> Coordinate {
        apply(&self.forward, p)
    }

    pub fn inverse_transform(&self, p: Coordinate) -> Coordinate {
        apply(&self.inverse, p)
    }

    pub fn transform_all(&self, points: &[Coordinate]) -> Vec<Coordinate> {
        points.iter().map(|p| self.transform(*p)).collect()
    }

    pub fn inverse_transform_all(&self, points: &[Coordinate]) -> Vec<Coordinate> {
        points.iter().map(|p| self.inverse_transform(*p)).collect()
    }

    /// Transform a box through all four of its corners.
    ///
    /// With rotation or shear the images of `ul` and `lr` no longer bound the
    /// result, so the new corners come from the extremes of all four images.
    /// The result keeps the per-axis orientation of `subset` itself.
    pub fn transform_subset(&self, subset: &Subset) -> Subset {
        apply_subset(&self.forward, subset)
    }

    pub fn inverse_transform_subset(&self, subset: &Subset) -> Subset {
        apply_subset(&self.inverse, subset)
    }
}

impl fmt::Display for AffineModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for AffineModel {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AffineModel::from_text(s, false)
    }
}

/// Algebraic inverse of a 2×3 affine matrix.
fn invert(c: &Coefficients) -> Result<Coefficients, AffineError> {
    let [a0, a1, a2, a3, a4, a5] = *c;
    let det = a1 * a5 - a2 * a4;
    // Scale-relative: fine pixel sizes make every cross product tiny
    let scale = (a1 * a5).abs().max((a2 * a4).abs());
    if !det.is_finite() || det == 0.0 || Tolerance::DEFAULT.negligible(det, scale) {
        return Err(AffineError::NonInvertible { det });
    }
    Ok([
        (a2 * a3 - a5 * a0) / det,
        a5 / det,
        -a2 / det,
        (a0 * a4 - a1 * a3) / det,
        -a4 / det,
        a1 / det,
    ])
}

fn matrix(c: &Coefficients) -> DAffine2 {
    DAffine2::from_cols_array(&[c[1], c[4], c[2], c[5], c[0], c[3]])
}

fn apply(c: &Coefficients, p: Coordinate) -> Coordinate {
    p.with_xy(matrix(c).transform_point2(p.xy()))
}

fn apply_subset(c: &Coefficients, subset: &Subset) -> Subset {
    let m = matrix(c);
    let images = subset.corners().map(|corner| m.transform_point2(corner.xy()));
    let min = images.iter().fold(images[0], |acc, p| acc.min(*p));
    let max = images.iter().fold(images[0], |acc, p| acc.max(*p));

    let orientation = subset.dimension();
    match (orientation.sign_x(), orientation.sign_y()) {
        (Sign::Positive, Sign::Positive) => Subset::new(min.x, min.y, max.x, max.y),
        (Sign::Positive, Sign::Negative) => Subset::new(min.x, max.y, max.x, min.y),
        (Sign::Negative, Sign::Positive) => Subset::new(max.x, min.y, min.x, max.y),
        (Sign::Negative, Sign::Negative) => Subset::new(max.x, max.y, min.x, min.y),
    }
}
