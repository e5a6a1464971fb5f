//! Tipper rotation
//!
//! Same broadcast and normalization semantics as the impedance-tensor
//! rotation, applied through vector rather than matrix rotation.

use ndarray::Array3;

use super::core::Tipper;
use crate::broadcast::PerFreq;
use crate::math::propagation::rotate_vector_with_errors;

impl Tipper {
    /// Rotate the tipper clockwise-positive from geographic north.
    ///
    /// Accepts a scalar angle broadcast to all indices or one angle per
    /// index (degrees, normalized mod 360; NaN means no rotation at
    /// that index). A wrong angle count warns and leaves all state
    /// untouched. Recomputes amplitude/phase and magnitude/direction
    /// afterward.
    pub fn rotate(&mut self, angles: impl Into<PerFreq>) {
        let n = self.nfreq();
        let angles = match angles.into().resolve(n) {
            Some(a) => a,
            None => {
                self.sink.warn(&format!(
                    "wrong number of rotation angles - need {} (or 1) - tipper unchanged",
                    n
                ));
                return;
            }
        };

        let mut t_rot = Array3::zeros(self.t.dim());
        let mut t_err_rot = self.t_err.as_ref().map(|_| Array3::<f64>::zeros(self.t.dim()));

        for i in 0..n {
            let angle = if angles[i].is_nan() {
                0.0
            } else {
                angles[i].rem_euclid(360.0)
            };
            self.rotation_angle[i] = (self.rotation_angle[i] + angle).rem_euclid(360.0);

            let errors = self
                .t_err
                .as_ref()
                .map(|e| (e[[i, 0, 0]], e[[i, 0, 1]]));
            let ((tx, ty), rotated_err) =
                rotate_vector_with_errors(self.t[[i, 0, 0]], self.t[[i, 0, 1]], angle, errors);
            t_rot[[i, 0, 0]] = tx;
            t_rot[[i, 0, 1]] = ty;
            if let (Some(dst), Some((ex, ey))) = (t_err_rot.as_mut(), rotated_err) {
                dst[[i, 0, 0]] = ex;
                dst[[i, 0, 1]] = ey;
            }
        }

        self.t = t_rot;
        self.t_err = t_err_rot;
        self.compute_amp_phase();
        self.compute_mag_direction();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CaptureSink;
    use approx::assert_relative_eq;
    use ndarray::array;
    use num_complex::Complex64;

    fn sample_tipper() -> Tipper {
        let t = array![[[Complex64::new(0.1, -0.05), Complex64::new(0.2, 0.15)]]];
        Tipper::new(t, None, Some(array![1.0])).unwrap()
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let mut tipper = sample_tipper();
        let before = tipper.tipper().clone();
        tipper.rotate(0.0);
        assert_eq!(tipper.rotation_angle()[0], 0.0);
        for c in 0..2 {
            assert_relative_eq!(
                tipper.tipper()[[0, 0, c]].re,
                before[[0, 0, c]].re,
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn test_rotate_accumulates_mod_360() {
        let mut tipper = sample_tipper();
        tipper.rotate(200.0);
        tipper.rotate(200.0);
        assert_relative_eq!(tipper.rotation_angle()[0], 40.0, epsilon = 1e-10);
    }

    #[test]
    fn test_rotate_wrong_count_warns() {
        let sink = CaptureSink::new();
        let mut tipper = sample_tipper().with_sink(sink.clone());
        tipper.rotate(vec![10.0, 20.0, 30.0]);
        assert_eq!(tipper.rotation_angle()[0], 0.0);
        assert_eq!(sink.messages().len(), 1);
    }
}
