//! Impedance tensor module - per-frequency 2x2 complex transfer function
//!
//! Provides the core [`ImpedanceTensor`] struct together with its
//! derived quantities (apparent resistivity, phase), rotations,
//! decompositions and distortion corrections.

mod core;
mod derived;
mod invariants;
mod orientation;
mod transform;

pub use self::core::ImpedanceTensor;
pub use invariants::Invariants;
pub use orientation::correct_sensor_orientation;
