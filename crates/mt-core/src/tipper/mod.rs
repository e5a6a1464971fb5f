//! Tipper module - per-frequency 1x2 complex transfer function
//!
//! Provides the [`Tipper`] struct relating vertical to horizontal
//! magnetic field components, with its derived amplitude/phase and
//! induction-arrow magnitude/direction.

mod core;
mod derived;
mod transform;

pub use self::core::Tipper;
