//! Tensor transformations
//!
//! Rotation into a new coordinate frame, per-frequency inversion, and
//! the two instrument-distortion corrections (static shift, galvanic
//! distortion). Corrections return fresh arrays and never mutate the
//! instance.

use ndarray::{s, Array2, Array3};
use num_complex::Complex64;

use super::core::ImpedanceTensor;
use crate::broadcast::PerFreq;
use crate::error::TensorError;
use crate::math::linalg::inv2_complex;
use crate::math::propagation::{invert_matrix_with_errors, rotate_matrix_with_errors};

impl ImpedanceTensor {
    /// Per-frequency inverse of Z. No error propagation.
    ///
    /// Fails on the first singular index.
    pub fn inverse(&self) -> Result<Array3<Complex64>, TensorError> {
        let mut out = Array3::<Complex64>::zeros(self.z.dim());
        for i in 0..self.nfreq() {
            let inv = inv2_complex(&self.z.slice(s![i, .., ..]))
                .ok_or(TensorError::SingularMatrix { index: i })?;
            out.slice_mut(s![i, .., ..]).assign(&inv);
        }
        Ok(out)
    }

    /// Rotate the tensor clockwise-positive from geographic north.
    ///
    /// Accepts a scalar angle broadcast to all indices or one angle per
    /// index (degrees, normalized mod 360; NaN means no rotation at
    /// that index). A wrong angle count warns and leaves all state
    /// untouched, including the rotation bookkeeping. Applies the 2D
    /// rotation conjugation with correlated error propagation, then
    /// recomputes resistivity and phase.
    pub fn rotate(&mut self, angles: impl Into<PerFreq>) {
        let n = self.nfreq();
        let angles = match angles.into().resolve(n) {
            Some(a) => a,
            None => {
                self.sink.warn(&format!(
                    "wrong number of rotation angles - need {} (or 1) - tensor unchanged",
                    n
                ));
                return;
            }
        };

        let mut z_rot = Array3::<Complex64>::zeros(self.z.dim());
        let mut z_err_rot = self.z_err.as_ref().map(|_| Array3::<f64>::zeros(self.z.dim()));

        for i in 0..n {
            let angle = if angles[i].is_nan() {
                0.0
            } else {
                angles[i].rem_euclid(360.0)
            };
            self.rotation_angle[i] = (self.rotation_angle[i] + angle).rem_euclid(360.0);

            let err_slice = self.z_err.as_ref().map(|e| e.slice(s![i, .., ..]));
            let (rotated, rotated_err) =
                rotate_matrix_with_errors(&self.z.slice(s![i, .., ..]), angle, err_slice.as_ref());
            z_rot.slice_mut(s![i, .., ..]).assign(&rotated);
            if let (Some(dst), Some(src)) = (z_err_rot.as_mut(), rotated_err) {
                dst.slice_mut(s![i, .., ..]).assign(&src);
            }
        }

        self.z = z_rot;
        self.z_err = z_err_rot;
        self.compute_res_phase();
    }

    /// Remove a frequency-independent static shift, assuming the
    /// observed tensor is `Z = S * Z0` with `S = diag(sqrt(fx), sqrt(fy))`.
    ///
    /// The factors are in resistivity scale, so row 0 is divided by
    /// `sqrt(factor_x)` and row 1 by `sqrt(factor_y)`. Returns the
    /// per-index static-shift matrix and the corrected tensor without
    /// mutating `self`; invalid factor counts or non-positive factors
    /// warn and return `None`.
    pub fn remove_static_shift(
        &self,
        factor_x: impl Into<PerFreq>,
        factor_y: impl Into<PerFreq>,
    ) -> Option<(Array3<f64>, Array3<Complex64>)> {
        let n = self.nfreq();
        let fx = match factor_x.into().resolve(n) {
            Some(f) => f,
            None => {
                self.sink.warn(&format!(
                    "wrong number of x static-shift factors - need {} (or 1)",
                    n
                ));
                return None;
            }
        };
        let fy = match factor_y.into().resolve(n) {
            Some(f) => f,
            None => {
                self.sink.warn(&format!(
                    "wrong number of y static-shift factors - need {} (or 1)",
                    n
                ));
                return None;
            }
        };
        if fx.iter().chain(fy.iter()).any(|&f| !(f > 0.0)) {
            self.sink
                .warn("static-shift factors must be positive - correction skipped");
            return None;
        }

        let mut static_shift = Array3::<f64>::zeros((n, 2, 2));
        let mut corrected = self.z.clone();
        for i in 0..n {
            let sx = fx[i].sqrt();
            let sy = fy[i].sqrt();
            for c in 0..2 {
                corrected[[i, 0, c]] = self.z[[i, 0, c]] / sx;
                corrected[[i, 1, c]] = self.z[[i, 1, c]] / sy;
            }
            static_shift[[i, 0, 0]] = sx;
            static_shift[[i, 1, 1]] = sy;
        }

        Some((static_shift, corrected))
    }

    /// Remove a galvanic distortion D from the observed tensor,
    /// `Z = D * Z0`, returning `(D, Z0, Z0_err)`.
    ///
    /// The one-norm error bound on each corrected element combines the
    /// four summands of the `D^-1 * Z` product: inverse-distortion
    /// error against the tensor, and inverse distortion against the
    /// tensor error. The corrected error is present when either input
    /// error is. Non-mutating.
    pub fn remove_distortion(
        &self,
        distortion: &Array2<f64>,
        distortion_err: Option<&Array2<f64>>,
    ) -> Result<(Array2<f64>, Array3<Complex64>, Option<Array3<f64>>), TensorError> {
        if distortion.dim() != (2, 2) {
            return Err(TensorError::InvalidShape {
                expected: "(2, 2)",
                got: distortion.shape().to_vec(),
            });
        }
        if let Some(err) = distortion_err {
            if err.dim() != (2, 2) {
                return Err(TensorError::InvalidShape {
                    expected: "(2, 2)",
                    got: err.shape().to_vec(),
                });
            }
        }

        let propagate = self.z_err.is_some() || distortion_err.is_some();
        let zero_err = Array2::<f64>::zeros((2, 2));
        let d_err = distortion_err.cloned().unwrap_or_else(|| zero_err.clone());

        let (di, di_err) = invert_matrix_with_errors(&distortion.view(), Some(&d_err.view()))
            .ok_or(TensorError::SingularDistortion)?;
        let di_err = di_err.unwrap_or(zero_err);

        let n = self.nfreq();
        let mut corrected = Array3::<Complex64>::zeros(self.z.dim());
        let mut corrected_err = propagate.then(|| Array3::<f64>::zeros(self.z.dim()));

        for i in 0..n {
            for r in 0..2 {
                for c in 0..2 {
                    corrected[[i, r, c]] =
                        di[[r, 0]] * self.z[[i, 0, c]] + di[[r, 1]] * self.z[[i, 1, c]];

                    if let Some(err_out) = corrected_err.as_mut() {
                        let z_err_0 = self.z_err.as_ref().map_or(0.0, |e| e[[i, 0, c]]);
                        let z_err_1 = self.z_err.as_ref().map_or(0.0, |e| e[[i, 1, c]]);
                        err_out[[i, r, c]] = (di_err[[r, 0]] * self.z[[i, 0, c]]).norm()
                            + (di[[r, 0]] * z_err_0).abs()
                            + (di_err[[r, 1]] * self.z[[i, 1, c]]).norm()
                            + (di[[r, 1]] * z_err_1).abs();
                    }
                }
            }
        }

        Ok((distortion.clone(), corrected, corrected_err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CaptureSink;
    use approx::assert_relative_eq;
    use ndarray::array;
    use ndarray::Array1;

    fn sample_tensor(n: usize) -> ImpedanceTensor {
        let mut z = Array3::<Complex64>::zeros((n, 2, 2));
        for i in 0..n {
            let scale = (i + 1) as f64;
            z[[i, 0, 0]] = Complex64::new(0.1 * scale, -0.2);
            z[[i, 0, 1]] = Complex64::new(1.0 * scale, 1.0);
            z[[i, 1, 0]] = Complex64::new(-1.0 * scale, -1.0);
            z[[i, 1, 1]] = Complex64::new(-0.1, 0.3 * scale);
        }
        let freq = Array1::from_iter((0..n).map(|i| 10.0 / (i + 1) as f64));
        ImpedanceTensor::new(z, None, Some(freq)).unwrap()
    }

    #[test]
    fn test_rotate_wrong_count_leaves_rotation_angle_untouched() {
        let sink = CaptureSink::new();
        let mut tensor = sample_tensor(3).with_sink(sink.clone());
        let before = tensor.tensor().clone();
        tensor.rotate(vec![10.0, 20.0]);
        assert_eq!(tensor.rotation_angle()[0], 0.0);
        assert_eq!(tensor.tensor(), &before);
        assert_eq!(sink.messages().len(), 1);
    }

    #[test]
    fn test_rotate_nan_is_zero_rotation() {
        let mut tensor = sample_tensor(2);
        let before = tensor.tensor().clone();
        tensor.rotate(vec![f64::NAN, 0.0]);
        assert_eq!(tensor.rotation_angle()[0], 0.0);
        for r in 0..2 {
            for c in 0..2 {
                assert_relative_eq!(
                    tensor.tensor()[[0, r, c]].re,
                    before[[0, r, c]].re,
                    epsilon = 1e-14
                );
            }
        }
    }

    #[test]
    fn test_rotate_negative_angle_normalizes() {
        let mut tensor = sample_tensor(1);
        tensor.rotate(-30.0);
        assert_relative_eq!(tensor.rotation_angle()[0], 330.0, epsilon = 1e-12);
    }

    #[test]
    fn test_static_shift_rejects_negative_factor() {
        let sink = CaptureSink::new();
        let tensor = sample_tensor(1).with_sink(sink.clone());
        assert!(tensor.remove_static_shift(-4.0, 1.0).is_none());
        assert_eq!(sink.messages().len(), 1);
    }

    #[test]
    fn test_remove_distortion_identity_preserves_errors() {
        let mut z = Array3::<Complex64>::zeros((1, 2, 2));
        z[[0, 0, 1]] = Complex64::new(1.0, 1.0);
        z[[0, 1, 0]] = Complex64::new(-1.0, -1.0);
        let z_err = Array3::<f64>::from_elem((1, 2, 2), 0.05);
        let tensor = ImpedanceTensor::new(z.clone(), Some(z_err.clone()), None).unwrap();

        let eye = array![[1.0, 0.0], [0.0, 1.0]];
        let (_, corrected, corrected_err) = tensor.remove_distortion(&eye, None).unwrap();
        assert_eq!(corrected, z);
        let corrected_err = corrected_err.unwrap();
        for r in 0..2 {
            for c in 0..2 {
                assert_relative_eq!(corrected_err[[0, r, c]], 0.05, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_remove_distortion_singular_fails() {
        let tensor = sample_tensor(1);
        let singular = array![[1.0, 2.0], [2.0, 4.0]];
        assert!(matches!(
            tensor.remove_distortion(&singular, None),
            Err(TensorError::SingularDistortion)
        ));
    }
}
