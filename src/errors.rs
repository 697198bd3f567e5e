//! Error types with diagnostics using miette
//!
//! Degenerate boxes handed to `World` mutators are not errors: they are
//! silently ignored. Only model construction and text decoding fail loudly.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Model Errors
// ============================================================================

/// Errors building an [`AffineModel`](crate::AffineModel)
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum AffineError {
    #[error("affine coefficients are not invertible (determinant {det})")]
    #[diagnostic(
        code(geoframe::affine::non_invertible),
        help("the cross products a1*a5 and a2*a4 must differ")
    )]
    NonInvertible { det: f64 },

    #[error("input corners share the same {axis} coordinate")]
    #[diagnostic(
        code(geoframe::affine::degenerate_corners),
        help("corner pairs must span a box with non-zero width and height")
    )]
    DegenerateCorners { axis: char },
}

// ============================================================================
// World Errors
// ============================================================================

/// Errors from checked [`World`](crate::World) transforms
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    #[error("spatial model is stale: no window or viewport to derive it from")]
    #[diagnostic(
        code(geoframe::world::stale_model),
        help("set a spatial reference, world, viewport and window before transforming")
    )]
    StaleModel,
}

// ============================================================================
// Text Errors
// ============================================================================

/// Errors decoding the textual affine parameter block
#[derive(Error, Diagnostic, Debug)]
pub enum TextError {
    #[error("malformed affine text: {message}")]
    #[diagnostic(code(geoframe::text::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("unsupported transform: {name}")]
    #[diagnostic(
        code(geoframe::text::unsupported_transform),
        help("only \"Affine\" parameter blocks are understood")
    )]
    UnsupportedTransform {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected \"Affine\"")]
        span: SourceSpan,
    },

    #[error("{param} must be {expected}, found {found}")]
    #[diagnostic(code(geoframe::text::wrong_shape))]
    WrongShape {
        param: &'static str,
        expected: u32,
        found: f64,
        #[source_code]
        src: NamedSource<String>,
        #[label("wrong matrix shape")]
        span: SourceSpan,
    },

    #[error("missing parameter: {name}")]
    #[diagnostic(code(geoframe::text::missing_parameter))]
    MissingParameter {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("in this block")]
        span: SourceSpan,
    },

    #[error("unknown parameter: {name}")]
    #[diagnostic(code(geoframe::text::unknown_parameter))]
    UnknownParameter {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not an affine parameter")]
        span: SourceSpan,
    },

    #[error("duplicate parameter: {name}")]
    #[diagnostic(code(geoframe::text::duplicate_parameter))]
    DuplicateParameter {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("given again here")]
        span: SourceSpan,
    },

    #[error("invalid number: {text}")]
    #[diagnostic(code(geoframe::text::invalid_number))]
    InvalidNumber {
        text: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid number")]
        span: SourceSpan,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] AffineError),
}
