//! Fatal error kinds for tensor operations
//!
//! Only truly unrecoverable conditions surface here: singular matrices
//! and missing prerequisite state. Expected misuse (shape or count
//! mismatches on setters) is reported through the diagnostics sink and
//! the operation becomes a no-op instead.

use thiserror::Error;

/// Errors raised by unrecoverable impedance-tensor and tipper operations.
#[derive(Error, Debug)]
pub enum TensorError {
    #[error("expected array of shape {expected}, got {got:?}")]
    InvalidShape {
        expected: &'static str,
        got: Vec<usize>,
    },

    #[error("matrix at frequency index {index} is singular and cannot be inverted")]
    SingularMatrix { index: usize },

    #[error("distortion tensor is singular and cannot be inverted")]
    SingularDistortion,

    #[error("frequency array must be set and length-matched before reconstructing the tensor")]
    MissingFrequencies,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
