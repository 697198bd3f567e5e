//! Coordinate frames for interactive raster/vector viewers.
//!
//! Three frames coexist in a viewer: **world** space (geographic or projected
//! coordinates), the **window** (the visible part of the world, same units)
//! and the **viewport** (the pixel grid the window is drawn onto). Every pan,
//! zoom, resize or reprojection is a mutation of a [`World`] followed by a
//! transform through its [`AffineModel`].
//!
//! ```
//! use geoframe::{Coordinate, Subset, World};
//!
//! let mut world = World::default();
//! world.set_world(Subset::new(0.0, 0.0, 100.0, 100.0));
//! world.set_spatial_reference("EPSG:4326");
//! world.set_viewport(200, 100);
//! world.set_window(Subset::new(0.0, 0.0, 100.0, 100.0));
//!
//! let p = world.transform(Coordinate::new(200.0, 100.0));
//! assert_eq!(p, Coordinate::new(100.0, 100.0));
//! ```

use pest_derive::Parser;

pub mod affine;
pub mod defaults;
pub mod errors;
pub mod log;
pub mod subset;
pub mod tolerance;
pub mod types;
pub mod world;

pub use affine::{AffineModel, Coefficients, TEXT_PRECISION};
pub use defaults::{ExtentCatalog, ExtentProvider};
pub use errors::{AffineError, TextError, WorldError};
pub use subset::Subset;
pub use tolerance::Tolerance;
pub use types::{Coordinate, Dimension, Sign, Viewport};
pub use world::{
    AspectPreserving, FreeWindow, SpatialModel, SpatialObserver, SubscriptionId, WindowConstraint,
    WindowPolicy, World,
};

/// Parser for the textual affine parameter block.
#[derive(Parser)]
#[grammar = "affine.pest"]
pub struct AffineTextParser;

#[cfg(test)]
mod tests {
    use super::*;
    use pest::Parser;

    #[test]
    fn parse_param_mt() {
        let input = r#"PARAM_MT["Affine",PARAMETER["num_row",2],PARAMETER["num_col",3]]"#;
        let result = AffineTextParser::parse(Rule::transform, input);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_nested_inverse() {
        let input = r#"INVERSE_MT[INVERSE_MT[PARAM_MT["Affine"]]]"#;
        let result = AffineTextParser::parse(Rule::transform, input);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_parameter() {
        let input = r#"PARAMETER["elt_0_2", -1.5e3]"#;
        let result = AffineTextParser::parse(Rule::parameter, input);
        assert!(result.is_ok(), "Failed to parse parameter: {:?}", result.err());
    }

    #[test]
    fn parse_numbers() {
        for input in ["0", "-3", "+2.5", ".5", "1.", "6.02e23", "1E-9"] {
            let result = AffineTextParser::parse(Rule::number, input);
            assert!(result.is_ok(), "Failed to parse number {input}: {:?}", result.err());
        }
    }

    #[test]
    fn reject_unbalanced() {
        let input = r#"PARAM_MT["Affine""#;
        assert!(AffineTextParser::parse(Rule::transform, input).is_err());
    }

    #[test]
    fn reject_trailing_garbage() {
        let input = r#"PARAM_MT["Affine"] extra"#;
        assert!(AffineTextParser::parse(Rule::transform, input).is_err());
    }

    #[test]
    fn reject_missing_value() {
        let input = r#"PARAMETER["elt_0_0"]"#;
        assert!(AffineTextParser::parse(Rule::parameter, input).is_err());
    }
}
