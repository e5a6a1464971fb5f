//! mt-core: Core magnetotelluric transfer-function library
//!
//! Manipulates complex-valued impedance tensors and magnetic tipper
//! vectors recovered from field measurements, and derives the physical
//! quantities downstream consumers plot or export (apparent
//! resistivity, phase, rotational invariants, induction arrows).
//!
//! ## Modules
//!
//! - `impedance` - per-frequency 2x2 impedance tensor (Z)
//! - `tipper` - per-frequency 1x2 magnetic tipper vector
//! - `math` - 2x2 linear algebra and first-order error propagation
//! - `diagnostics` - injectable sink for non-fatal validation warnings
//! - `broadcast` - scalar-or-per-frequency argument handling

pub mod broadcast;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod impedance;
pub mod math;
pub mod tipper;

pub use broadcast::PerFreq;
pub use diagnostics::{CaptureSink, DiagnosticsSink, LogSink};
pub use error::TensorError;
pub use impedance::{ImpedanceTensor, Invariants};
pub use tipper::Tipper;
