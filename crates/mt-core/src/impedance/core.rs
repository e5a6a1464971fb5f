//! Core ImpedanceTensor struct, constructors and setters
//!
//! The tensor is a complex array of shape (n_freq, 2, 2) with component
//! order Zxx (0,0), Zxy (0,1), Zyx (1,0), Zyy (1,1). All errors are
//! standard deviations (sqrt of the variance). Derived resistivity and
//! phase are recomputed synchronously on every mutating call; they are
//! `None` whenever the frequency array is unset.

use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, Array2, Array3};
use num_complex::Complex64;

use crate::diagnostics::{DiagnosticsSink, LogSink};
use crate::error::TensorError;

/// A per-frequency 2x2 complex impedance tensor (Z) with optional
/// standard-deviation errors and frequencies.
#[derive(Clone)]
pub struct ImpedanceTensor {
    pub(crate) z: Array3<Complex64>,
    pub(crate) z_err: Option<Array3<f64>>,
    pub(crate) freq: Option<Array1<f64>>,
    /// Cumulative rotation per frequency index, degrees in [0, 360).
    pub(crate) rotation_angle: Array1<f64>,
    pub(crate) resistivity: Option<Array3<f64>>,
    pub(crate) resistivity_err: Option<Array3<f64>>,
    pub(crate) phase: Option<Array3<f64>>,
    pub(crate) phase_err: Option<Array3<f64>>,
    pub(crate) sink: Arc<dyn DiagnosticsSink>,
}

impl ImpedanceTensor {
    /// Create a new impedance tensor from an (N, 2, 2) complex array.
    ///
    /// A tensor with the wrong shape is a fatal construction error. A
    /// mismatched error array or frequency array is dropped with a
    /// diagnostics warning and the field left unset, so the instance is
    /// still usable.
    pub fn new(
        z: Array3<Complex64>,
        z_err: Option<Array3<f64>>,
        freq: Option<Array1<f64>>,
    ) -> Result<Self, TensorError> {
        let dim = z.dim();
        if dim.1 != 2 || dim.2 != 2 || dim.0 == 0 {
            return Err(TensorError::InvalidShape {
                expected: "(N, 2, 2)",
                got: z.shape().to_vec(),
            });
        }

        let n = dim.0;
        let mut tensor = Self {
            rotation_angle: Array1::zeros(n),
            z,
            z_err: None,
            freq: None,
            resistivity: None,
            resistivity_err: None,
            phase: None,
            phase_err: None,
            sink: Arc::new(LogSink),
        };

        if let Some(err) = z_err {
            if err.dim() == dim {
                tensor.z_err = Some(err);
            } else {
                tensor.sink.warn(&format!(
                    "tensor_err shape {:?} does not match tensor shape {:?} - left unset",
                    err.shape(),
                    tensor.z.shape()
                ));
            }
        }

        if let Some(f) = freq {
            if f.len() == n {
                tensor.freq = Some(f);
            } else {
                tensor.sink.warn(&format!(
                    "frequency length {} does not match tensor length {} - left unset",
                    f.len(),
                    n
                ));
            }
        }

        tensor.compute_res_phase();
        Ok(tensor)
    }

    /// Create from a single 2x2 matrix, promoted to a length-1 tensor.
    pub fn from_matrix(
        z: Array2<Complex64>,
        z_err: Option<Array2<f64>>,
        freq: Option<Array1<f64>>,
    ) -> Result<Self, TensorError> {
        if z.dim() != (2, 2) {
            return Err(TensorError::InvalidShape {
                expected: "(2, 2)",
                got: z.shape().to_vec(),
            });
        }
        let z3 = z.insert_axis(ndarray::Axis(0));
        let z_err3 = z_err.map(|e| e.insert_axis(ndarray::Axis(0)));
        Self::new(z3, z_err3, freq)
    }

    /// Replace the diagnostics sink (builder style).
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Number of frequency indices.
    #[inline]
    pub fn nfreq(&self) -> usize {
        self.z.dim().0
    }

    #[inline]
    pub fn tensor(&self) -> &Array3<Complex64> {
        &self.z
    }

    #[inline]
    pub fn tensor_err(&self) -> Option<&Array3<f64>> {
        self.z_err.as_ref()
    }

    #[inline]
    pub fn frequencies(&self) -> Option<&Array1<f64>> {
        self.freq.as_ref()
    }

    #[inline]
    pub fn rotation_angle(&self) -> &Array1<f64> {
        &self.rotation_angle
    }

    /// Apparent resistivity in Ohm-m, `None` until frequencies are set.
    #[inline]
    pub fn resistivity(&self) -> Option<&Array3<f64>> {
        self.resistivity.as_ref()
    }

    #[inline]
    pub fn resistivity_err(&self) -> Option<&Array3<f64>> {
        self.resistivity_err.as_ref()
    }

    /// Impedance phase in degrees, `None` until frequencies are set.
    #[inline]
    pub fn phase(&self) -> Option<&Array3<f64>> {
        self.phase.as_ref()
    }

    #[inline]
    pub fn phase_err(&self) -> Option<&Array3<f64>> {
        self.phase_err.as_ref()
    }

    /// Real part of the tensor.
    pub fn real(&self) -> Array3<f64> {
        self.z.mapv(|c| c.re)
    }

    /// Imaginary part of the tensor.
    pub fn imag(&self) -> Array3<f64> {
        self.z.mapv(|c| c.im)
    }

    /// Replace the tensor array.
    ///
    /// The new array must be (M, 2, 2) and length-compatible with any
    /// held error and frequency arrays; otherwise the call warns and
    /// leaves everything unchanged. A length change resets the
    /// cumulative rotation to zeros.
    pub fn set_tensor(&mut self, z: Array3<Complex64>) {
        let dim = z.dim();
        if dim.1 != 2 || dim.2 != 2 || dim.0 == 0 {
            self.sink.warn(&format!(
                "tensor array has shape {:?}, expected (N, 2, 2) - tensor unchanged",
                z.shape()
            ));
            return;
        }
        if let Some(err) = &self.z_err {
            if err.dim() != dim {
                self.sink.warn(&format!(
                    "tensor shape {:?} does not match held tensor_err shape {:?} - tensor unchanged",
                    z.shape(),
                    err.shape()
                ));
                return;
            }
        }
        if let Some(f) = &self.freq {
            if f.len() != dim.0 {
                self.sink.warn(&format!(
                    "tensor length {} does not match held frequency length {} - tensor unchanged",
                    dim.0,
                    f.len()
                ));
                return;
            }
        }

        if self.rotation_angle.len() != dim.0 {
            self.rotation_angle = Array1::zeros(dim.0);
        }
        self.z = z;
        self.compute_res_phase();
    }

    /// Replace the per-element standard deviations.
    ///
    /// The shape must equal the tensor shape; otherwise the call warns
    /// and no-ops.
    pub fn set_tensor_err(&mut self, z_err: Array3<f64>) {
        if z_err.dim() != self.z.dim() {
            self.sink.warn(&format!(
                "tensor_err shape {:?} does not match tensor shape {:?} - tensor_err unchanged",
                z_err.shape(),
                self.z.shape()
            ));
            return;
        }
        self.z_err = Some(z_err);
        self.compute_res_phase();
    }

    /// Replace the frequency array (Hz).
    ///
    /// The length must equal the tensor length; otherwise the call
    /// warns and no-ops.
    pub fn set_frequencies(&mut self, freq: Array1<f64>) {
        if freq.len() != self.nfreq() {
            self.sink.warn(&format!(
                "frequency length {} does not match tensor length {} - frequencies unchanged",
                freq.len(),
                self.nfreq()
            ));
            return;
        }
        self.freq = Some(freq);
        self.compute_res_phase();
    }
}

impl fmt::Debug for ImpedanceTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImpedanceTensor")
            .field("z", &self.z)
            .field("z_err", &self.z_err)
            .field("freq", &self.freq)
            .field("rotation_angle", &self.rotation_angle)
            .finish_non_exhaustive()
    }
}
