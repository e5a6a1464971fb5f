//! Derived resistivity and phase
//!
//! Apparent resistivity (Ohm-m) and impedance phase (degrees) are
//! recomputed from the tensor after every mutation, together with
//! their propagated standard deviations when tensor errors are held.

use ndarray::Array3;
use num_complex::Complex64;

use super::core::ImpedanceTensor;
use crate::constants::{APPARENT_RESISTIVITY_FACTOR, RESISTIVITY_TO_AMPLITUDE_FACTOR};
use crate::error::TensorError;
use crate::math::propagation::{polar_to_rect_error, rect_to_polar_error};

impl ImpedanceTensor {
    /// Recompute resistivity and phase from the current tensor.
    ///
    /// `resistivity[i, r, c] = |Z[i, r, c]|^2 / freq[i] * 0.2` and
    /// `phase[i, r, c]` is the atan2 phase of `Z[i, r, c]` in degrees.
    /// Without a frequency array the derived state is cleared rather
    /// than left stale. Called internally by every mutating operation;
    /// public so the recompute contract is directly testable.
    pub fn compute_res_phase(&mut self) {
        let freq = match &self.freq {
            Some(f) => f,
            None => {
                self.resistivity = None;
                self.resistivity_err = None;
                self.phase = None;
                self.phase_err = None;
                return;
            }
        };

        let dim = self.z.dim();
        let mut resistivity = Array3::<f64>::zeros(dim);
        let mut phase = Array3::<f64>::zeros(dim);
        let mut resistivity_err = self.z_err.as_ref().map(|_| Array3::<f64>::zeros(dim));
        let mut phase_err = self.z_err.as_ref().map(|_| Array3::<f64>::zeros(dim));

        for i in 0..dim.0 {
            for r in 0..2 {
                for c in 0..2 {
                    let z = self.z[[i, r, c]];
                    resistivity[[i, r, c]] =
                        z.norm_sqr() / freq[i] * APPARENT_RESISTIVITY_FACTOR;
                    phase[[i, r, c]] = z.arg().to_degrees();

                    if let Some(z_err) = &self.z_err {
                        let err = z_err[[i, r, c]];
                        let (r_err, phi_err) = rect_to_polar_error(z.re, err, z.im, err);
                        if let Some(res_err) = resistivity_err.as_mut() {
                            res_err[[i, r, c]] = 2.0 * APPARENT_RESISTIVITY_FACTOR * z.norm()
                                / freq[i]
                                * r_err;
                        }
                        if let Some(ph_err) = phase_err.as_mut() {
                            ph_err[[i, r, c]] = phi_err;
                        }
                    }
                }
            }
        }

        self.resistivity = Some(resistivity);
        self.phase = Some(phase);
        self.resistivity_err = resistivity_err;
        self.phase_err = phase_err;
    }

    /// Rebuild the tensor from apparent resistivity (Ohm-m) and phase
    /// (degrees): `|Z| = sqrt(5 * freq * res)`, angle from the phase.
    ///
    /// Shape mismatches against the held tensor warn and no-op. A
    /// missing or length-mismatched frequency array is fatal since the
    /// amplitude cannot be reconstructed without it. When both error
    /// arrays are given, the tensor error is rebuilt by propagating the
    /// relative resistivity error (halved, the exponent of the
    /// amplitude relation) and the phase error to rectangular form,
    /// keeping the larger of the two components.
    pub fn set_res_phase(
        &mut self,
        res: &Array3<f64>,
        phase: &Array3<f64>,
        res_err: Option<&Array3<f64>>,
        phase_err: Option<&Array3<f64>>,
    ) -> Result<(), TensorError> {
        if res.dim() != self.z.dim() {
            self.sink.warn(&format!(
                "res shape {:?} does not match tensor shape {:?} - tensor unchanged",
                res.shape(),
                self.z.shape()
            ));
            return Ok(());
        }
        if phase.dim() != res.dim() {
            self.sink.warn(&format!(
                "phase shape {:?} does not match res shape {:?} - tensor unchanged",
                phase.shape(),
                res.shape()
            ));
            return Ok(());
        }

        let n = res.dim().0;
        let freq = match &self.freq {
            Some(f) if f.len() == n => f.clone(),
            _ => return Err(TensorError::MissingFrequencies),
        };

        let mut z_new = Array3::<Complex64>::zeros(res.dim());
        for i in 0..n {
            for r in 0..2 {
                for c in 0..2 {
                    let abs_z =
                        (RESISTIVITY_TO_AMPLITUDE_FACTOR * freq[i] * res[[i, r, c]]).sqrt();
                    z_new[[i, r, c]] =
                        Complex64::from_polar(abs_z, phase[[i, r, c]].to_radians());
                }
            }
        }
        self.z = z_new;

        if let (Some(res_err), Some(phase_err)) = (res_err, phase_err) {
            if res_err.dim() != res.dim() || phase_err.dim() != res.dim() {
                self.sink.warn(&format!(
                    "error array shapes {:?} / {:?} do not match res shape {:?} - tensor_err unchanged",
                    res_err.shape(),
                    phase_err.shape(),
                    res.shape()
                ));
                self.compute_res_phase();
                return Ok(());
            }

            let mut z_err_new = Array3::<f64>::zeros(res.dim());
            for i in 0..n {
                for r in 0..2 {
                    for c in 0..2 {
                        let abs_z = (RESISTIVITY_TO_AMPLITUDE_FACTOR
                            * freq[i]
                            * res[[i, r, c]])
                            .sqrt();
                        let rel_error_res = res_err[[i, r, c]] / res[[i, r, c]];
                        let abs_z_error = 0.5 * abs_z * rel_error_res;
                        let (x_err, y_err) = polar_to_rect_error(
                            abs_z,
                            abs_z_error,
                            phase[[i, r, c]],
                            phase_err[[i, r, c]],
                        );
                        z_err_new[[i, r, c]] = x_err.max(y_err);
                    }
                }
            }
            self.z_err = Some(z_err_new);
        }

        self.compute_res_phase();
        Ok(())
    }
}
