//! Core Tipper struct, constructors and setters
//!
//! The tipper is a complex array of shape (n_freq, 1, 2) with
//! component order Tx (0,0), Ty (0,1). Errors are standard deviations.
//! Amplitude/phase and induction-arrow magnitude/direction are
//! recomputed synchronously on every mutating call; unlike the
//! impedance tensor they do not depend on the frequency array.

use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, Array2, Array3};
use num_complex::Complex64;

use crate::diagnostics::{DiagnosticsSink, LogSink};
use crate::error::TensorError;

/// A per-frequency 1x2 complex tipper vector {Tx, Ty} with optional
/// standard-deviation errors and frequencies.
#[derive(Clone)]
pub struct Tipper {
    pub(crate) t: Array3<Complex64>,
    pub(crate) t_err: Option<Array3<f64>>,
    pub(crate) freq: Option<Array1<f64>>,
    /// Cumulative rotation per frequency index, degrees in [0, 360).
    pub(crate) rotation_angle: Array1<f64>,
    pub(crate) amplitude: Array3<f64>,
    pub(crate) amplitude_err: Option<Array3<f64>>,
    pub(crate) phase: Array3<f64>,
    pub(crate) phase_err: Option<Array3<f64>>,
    pub(crate) mag_real: Array1<f64>,
    pub(crate) mag_imag: Array1<f64>,
    pub(crate) angle_real: Array1<f64>,
    pub(crate) angle_imag: Array1<f64>,
    pub(crate) mag_err: Option<Array1<f64>>,
    pub(crate) angle_err: Option<Array1<f64>>,
    pub(crate) sink: Arc<dyn DiagnosticsSink>,
}

impl Tipper {
    /// Create a new tipper from an (N, 1, 2) complex array.
    ///
    /// A tipper with the wrong shape is a fatal construction error; a
    /// mismatched error or frequency array is dropped with a
    /// diagnostics warning and the field left unset.
    pub fn new(
        t: Array3<Complex64>,
        t_err: Option<Array3<f64>>,
        freq: Option<Array1<f64>>,
    ) -> Result<Self, TensorError> {
        let dim = t.dim();
        if dim.1 != 1 || dim.2 != 2 || dim.0 == 0 {
            return Err(TensorError::InvalidShape {
                expected: "(N, 1, 2)",
                got: t.shape().to_vec(),
            });
        }

        let n = dim.0;
        let mut tipper = Self {
            rotation_angle: Array1::zeros(n),
            t,
            t_err: None,
            freq: None,
            amplitude: Array3::zeros(dim),
            amplitude_err: None,
            phase: Array3::zeros(dim),
            phase_err: None,
            mag_real: Array1::zeros(n),
            mag_imag: Array1::zeros(n),
            angle_real: Array1::zeros(n),
            angle_imag: Array1::zeros(n),
            mag_err: None,
            angle_err: None,
            sink: Arc::new(LogSink),
        };

        if let Some(err) = t_err {
            if err.dim() == dim {
                tipper.t_err = Some(err);
            } else {
                tipper.sink.warn(&format!(
                    "tipper_err shape {:?} does not match tipper shape {:?} - left unset",
                    err.shape(),
                    tipper.t.shape()
                ));
            }
        }

        if let Some(f) = freq {
            if f.len() == n {
                tipper.freq = Some(f);
            } else {
                tipper.sink.warn(&format!(
                    "frequency length {} does not match tipper length {} - left unset",
                    f.len(),
                    n
                ));
            }
        }

        tipper.compute_amp_phase();
        tipper.compute_mag_direction();
        Ok(tipper)
    }

    /// Create from a single 1x2 vector, promoted to a length-1 tipper.
    pub fn from_vector(
        t: Array2<Complex64>,
        t_err: Option<Array2<f64>>,
        freq: Option<Array1<f64>>,
    ) -> Result<Self, TensorError> {
        if t.dim() != (1, 2) {
            return Err(TensorError::InvalidShape {
                expected: "(1, 2)",
                got: t.shape().to_vec(),
            });
        }
        let t3 = t.insert_axis(ndarray::Axis(0));
        let t_err3 = t_err.map(|e| e.insert_axis(ndarray::Axis(0)));
        Self::new(t3, t_err3, freq)
    }

    /// Replace the diagnostics sink (builder style).
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Number of frequency indices.
    #[inline]
    pub fn nfreq(&self) -> usize {
        self.t.dim().0
    }

    #[inline]
    pub fn tipper(&self) -> &Array3<Complex64> {
        &self.t
    }

    #[inline]
    pub fn tipper_err(&self) -> Option<&Array3<f64>> {
        self.t_err.as_ref()
    }

    #[inline]
    pub fn frequencies(&self) -> Option<&Array1<f64>> {
        self.freq.as_ref()
    }

    #[inline]
    pub fn rotation_angle(&self) -> &Array1<f64> {
        &self.rotation_angle
    }

    #[inline]
    pub fn amplitude(&self) -> &Array3<f64> {
        &self.amplitude
    }

    #[inline]
    pub fn amplitude_err(&self) -> Option<&Array3<f64>> {
        self.amplitude_err.as_ref()
    }

    /// Component phase in degrees.
    #[inline]
    pub fn phase(&self) -> &Array3<f64> {
        &self.phase
    }

    #[inline]
    pub fn phase_err(&self) -> Option<&Array3<f64>> {
        self.phase_err.as_ref()
    }

    /// Magnitude of the real induction arrow per index.
    #[inline]
    pub fn mag_real(&self) -> &Array1<f64> {
        &self.mag_real
    }

    #[inline]
    pub fn mag_imag(&self) -> &Array1<f64> {
        &self.mag_imag
    }

    /// Direction of the real induction arrow, degrees (Parkinson
    /// convention: arrows point toward the conductor).
    #[inline]
    pub fn angle_real(&self) -> &Array1<f64> {
        &self.angle_real
    }

    #[inline]
    pub fn angle_imag(&self) -> &Array1<f64> {
        &self.angle_imag
    }

    #[inline]
    pub fn mag_err(&self) -> Option<&Array1<f64>> {
        self.mag_err.as_ref()
    }

    #[inline]
    pub fn angle_err(&self) -> Option<&Array1<f64>> {
        self.angle_err.as_ref()
    }

    /// Replace the tipper array.
    ///
    /// The new array must be (M, 1, 2) and length-compatible with any
    /// held error and frequency arrays; otherwise the call warns and
    /// leaves everything unchanged. A length change resets the
    /// cumulative rotation to zeros.
    pub fn set_tipper(&mut self, t: Array3<Complex64>) {
        let dim = t.dim();
        if dim.1 != 1 || dim.2 != 2 || dim.0 == 0 {
            self.sink.warn(&format!(
                "tipper array has shape {:?}, expected (N, 1, 2) - tipper unchanged",
                t.shape()
            ));
            return;
        }
        if let Some(err) = &self.t_err {
            if err.dim() != dim {
                self.sink.warn(&format!(
                    "tipper shape {:?} does not match held tipper_err shape {:?} - tipper unchanged",
                    t.shape(),
                    err.shape()
                ));
                return;
            }
        }
        if let Some(f) = &self.freq {
            if f.len() != dim.0 {
                self.sink.warn(&format!(
                    "tipper length {} does not match held frequency length {} - tipper unchanged",
                    dim.0,
                    f.len()
                ));
                return;
            }
        }

        if self.rotation_angle.len() != dim.0 {
            self.rotation_angle = Array1::zeros(dim.0);
        }
        self.t = t;
        self.compute_amp_phase();
        self.compute_mag_direction();
    }

    /// Replace the per-element standard deviations.
    ///
    /// The shape must equal the tipper shape; otherwise the call warns
    /// and no-ops.
    pub fn set_tipper_err(&mut self, t_err: Array3<f64>) {
        if t_err.dim() != self.t.dim() {
            self.sink.warn(&format!(
                "tipper_err shape {:?} does not match tipper shape {:?} - tipper_err unchanged",
                t_err.shape(),
                self.t.shape()
            ));
            return;
        }
        self.t_err = Some(t_err);
        self.compute_amp_phase();
        self.compute_mag_direction();
    }

    /// Replace the frequency array (Hz).
    ///
    /// The length must equal the tipper length; otherwise the call
    /// warns and no-ops.
    pub fn set_frequencies(&mut self, freq: Array1<f64>) {
        if freq.len() != self.nfreq() {
            self.sink.warn(&format!(
                "frequency length {} does not match tipper length {} - frequencies unchanged",
                freq.len(),
                self.nfreq()
            ));
            return;
        }
        self.freq = Some(freq);
    }
}

impl fmt::Debug for Tipper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tipper")
            .field("t", &self.t)
            .field("t_err", &self.t_err)
            .field("freq", &self.freq)
            .field("rotation_angle", &self.rotation_angle)
            .finish_non_exhaustive()
    }
}
