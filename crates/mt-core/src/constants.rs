//! Numerical constants for magnetotelluric calculations
//!
//! Provides the SI unit-convention factors and tolerance values used
//! throughout the library.

/// Factor relating |Z|^2 / f to apparent resistivity in Ohm-m.
/// Comes from the mu0 / (4 pi) SI convention with Z in mV/km/nT and f in Hz.
pub const APPARENT_RESISTIVITY_FACTOR: f64 = 0.2;

/// Inverse of [`APPARENT_RESISTIVITY_FACTOR`]: |Z| = sqrt(5 * f * rho_a).
pub const RESISTIVITY_TO_AMPLITUDE_FACTOR: f64 = 5.0;

/// Tolerance for detecting near-zero values in division and singularity checks.
pub const NEAR_ZERO: f64 = 1e-15;
