//! Derived tipper quantities
//!
//! Component amplitude/phase and the induction-arrow polar form
//! (magnitude and direction of the real and imaginary vectors), plus
//! the polar setters that rebuild the tipper from them.

use ndarray::{Array1, Array3};
use num_complex::Complex64;

use super::core::Tipper;
use crate::math::propagation::rect_to_polar_error;

impl Tipper {
    /// Recompute component amplitude `|T|` and phase (degrees) from
    /// the current tipper, propagating errors when held. Called
    /// internally by every mutating operation; public so the recompute
    /// contract is directly testable.
    pub fn compute_amp_phase(&mut self) {
        let dim = self.t.dim();
        let mut amplitude = Array3::<f64>::zeros(dim);
        let mut phase = Array3::<f64>::zeros(dim);
        let mut amplitude_err = self.t_err.as_ref().map(|_| Array3::<f64>::zeros(dim));
        let mut phase_err = self.t_err.as_ref().map(|_| Array3::<f64>::zeros(dim));

        for i in 0..dim.0 {
            for c in 0..2 {
                let t = self.t[[i, 0, c]];
                amplitude[[i, 0, c]] = t.norm();
                phase[[i, 0, c]] = t.arg().to_degrees();

                if let Some(t_err) = &self.t_err {
                    let err = t_err[[i, 0, c]];
                    let (r_err, phi_err) = rect_to_polar_error(t.re, err, t.im, err);
                    if let Some(amp_err) = amplitude_err.as_mut() {
                        amp_err[[i, 0, c]] = r_err;
                    }
                    if let Some(ph_err) = phase_err.as_mut() {
                        ph_err[[i, 0, c]] = phi_err;
                    }
                }
            }
        }

        self.amplitude = amplitude;
        self.phase = phase;
        self.amplitude_err = amplitude_err;
        self.phase_err = phase_err;
    }

    /// Recompute the induction-arrow polar form.
    ///
    /// `mag_real = hypot(Re Tx, Re Ty)` and the direction is
    /// `atan2(-Re Ty, -Re Tx)` in degrees: both components are negated
    /// so the arrows point toward the conductor (Parkinson
    /// convention). The imaginary arrow is analogous. The error
    /// estimates are rough: magnitude error by quadrature,
    /// `angle_err = atan2(err_x, err_y) mod 45` degrees, a documented
    /// heuristic rather than exact propagation.
    pub fn compute_mag_direction(&mut self) {
        let n = self.nfreq();
        self.mag_real = Array1::from_shape_fn(n, |i| {
            self.t[[i, 0, 0]].re.hypot(self.t[[i, 0, 1]].re)
        });
        self.mag_imag = Array1::from_shape_fn(n, |i| {
            self.t[[i, 0, 0]].im.hypot(self.t[[i, 0, 1]].im)
        });
        self.angle_real = Array1::from_shape_fn(n, |i| {
            (-self.t[[i, 0, 1]].re).atan2(-self.t[[i, 0, 0]].re).to_degrees()
        });
        self.angle_imag = Array1::from_shape_fn(n, |i| {
            (-self.t[[i, 0, 1]].im).atan2(-self.t[[i, 0, 0]].im).to_degrees()
        });

        match &self.t_err {
            Some(err) => {
                self.mag_err = Some(Array1::from_shape_fn(n, |i| {
                    err[[i, 0, 0]].hypot(err[[i, 0, 1]])
                }));
                self.angle_err = Some(Array1::from_shape_fn(n, |i| {
                    err[[i, 0, 0]]
                        .atan2(err[[i, 0, 1]])
                        .to_degrees()
                        .rem_euclid(45.0)
                }));
            }
            None => {
                self.mag_err = None;
                self.angle_err = None;
            }
        }
    }

    /// Rebuild the tipper from component amplitude and phase (degrees).
    ///
    /// Shape mismatches against the held tipper warn and no-op.
    pub fn set_amp_phase(&mut self, r: &Array3<f64>, phi: &Array3<f64>) {
        if r.dim() != self.t.dim() {
            self.sink.warn(&format!(
                "amplitude shape {:?} does not match tipper shape {:?} - tipper unchanged",
                r.shape(),
                self.t.shape()
            ));
            return;
        }
        if phi.dim() != r.dim() {
            self.sink.warn(&format!(
                "phase shape {:?} does not match amplitude shape {:?} - tipper unchanged",
                phi.shape(),
                r.shape()
            ));
            return;
        }

        let mut t_new = Array3::<Complex64>::zeros(r.dim());
        for i in 0..r.dim().0 {
            for c in 0..2 {
                t_new[[i, 0, c]] =
                    Complex64::from_polar(r[[i, 0, c]], phi[[i, 0, c]].to_radians());
            }
        }
        self.t = t_new;
        self.compute_amp_phase();
        self.compute_mag_direction();
    }

    /// Rebuild the tipper components from induction-arrow magnitude
    /// and direction (degrees).
    ///
    /// Legacy trigonometric inverse carried over from the original
    /// formulation: `Re Tx = sqrt(m^2 atan(a)^2 / (1 - atan(a)^2))`,
    /// `Re Ty = sqrt(m^2 / (1 - atan(a)^2))`, same for the imaginary
    /// parts. It performs no error propagation and its domain (the
    /// atan argument) is unchecked, so treat it as an approximate
    /// inverse of [`Tipper::compute_mag_direction`].
    pub fn set_mag_direction(
        &mut self,
        mag_real: &Array1<f64>,
        ang_real: &Array1<f64>,
        mag_imag: &Array1<f64>,
        ang_imag: &Array1<f64>,
    ) {
        let n = self.nfreq();
        if mag_real.len() != n
            || ang_real.len() != n
            || mag_imag.len() != n
            || ang_imag.len() != n
        {
            self.sink.warn(&format!(
                "magnitude/direction arrays must all have length {} - tipper unchanged",
                n
            ));
            return;
        }

        for i in 0..n {
            let ta_re = ang_real[i].atan();
            let ta_im = ang_imag[i].atan();
            let re_x = (mag_real[i].powi(2) * ta_re.powi(2) / (1.0 - ta_re.powi(2))).sqrt();
            let re_y = (mag_real[i].powi(2) / (1.0 - ta_re.powi(2))).sqrt();
            let im_x = (mag_imag[i].powi(2) * ta_im.powi(2) / (1.0 - ta_im.powi(2))).sqrt();
            let im_y = (mag_imag[i].powi(2) / (1.0 - ta_im.powi(2))).sqrt();
            self.t[[i, 0, 0]] = Complex64::new(re_x, im_x);
            self.t[[i, 0, 1]] = Complex64::new(re_y, im_y);
        }

        self.compute_amp_phase();
        self.compute_mag_direction();
    }
}
