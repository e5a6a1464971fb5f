//! Mathematical functions module
//!
//! 2x2 linear algebra and first-order error propagation used by the
//! impedance-tensor and tipper components.

pub mod linalg;
pub mod propagation;

pub use linalg::*;
pub use propagation::*;
