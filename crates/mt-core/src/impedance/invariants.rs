//! Rotational invariants and dimensionality reductions
//!
//! Scalar quantities derived per frequency index: trace, skew,
//! determinant, Frobenius norm, the combined invariant set, and the
//! 1D/2D reductions of the tensor. All reads; nothing here mutates the
//! tensor.

use ndarray::{s, Array1, Array3};
use num_complex::Complex64;

use super::core::ImpedanceTensor;
use crate::math::linalg::{det2_complex, det2_real};

/// Rotation-invariant quantities of Z, one entry per frequency index.
#[derive(Debug, Clone)]
pub struct Invariants {
    /// (Zxy - Zyx) / 2
    pub z1: Array1<Complex64>,
    pub det: Array1<Complex64>,
    /// Determinant of the real part alone.
    pub det_real: Array1<f64>,
    /// Determinant of the imaginary part alone.
    pub det_imag: Array1<f64>,
    pub trace: Array1<Complex64>,
    pub skew: Array1<Complex64>,
    pub norm: Array1<f64>,
    /// z1 + sqrt(z1^2 - det)
    pub lambda_plus: Array1<Complex64>,
    /// z1 - sqrt(z1^2 - det)
    pub lambda_minus: Array1<Complex64>,
    /// norm^2 / 2 + sqrt(norm^4 / 4 + |det|^2)
    pub sigma_plus: Array1<f64>,
    /// norm^2 / 2 - sqrt(norm^4 / 4 + |det|^2)
    pub sigma_minus: Array1<f64>,
}

impl ImpedanceTensor {
    /// Trace of Z per index, with the summed diagonal error when
    /// tensor errors are held.
    pub fn trace(&self) -> (Array1<Complex64>, Option<Array1<f64>>) {
        let n = self.nfreq();
        let tr = Array1::from_shape_fn(n, |i| self.z[[i, 0, 0]] + self.z[[i, 1, 1]]);
        let tr_err = self
            .z_err
            .as_ref()
            .map(|e| Array1::from_shape_fn(n, |i| e[[i, 0, 0]] + e[[i, 1, 1]]));
        (tr, tr_err)
    }

    /// Skew (off-diagonal trace) `Zxy - Zyx` per index, with the summed
    /// off-diagonal error.
    pub fn skew(&self) -> (Array1<Complex64>, Option<Array1<f64>>) {
        let n = self.nfreq();
        let sk = Array1::from_shape_fn(n, |i| self.z[[i, 0, 1]] - self.z[[i, 1, 0]]);
        let sk_err = self
            .z_err
            .as_ref()
            .map(|e| Array1::from_shape_fn(n, |i| e[[i, 0, 1]] + e[[i, 1, 0]]));
        (sk, sk_err)
    }

    /// Determinant of Z per index. The error is the sum of the four
    /// cross terms, each element error scaled by the magnitude of its
    /// cofactor element.
    pub fn det(&self) -> (Array1<Complex64>, Option<Array1<f64>>) {
        let n = self.nfreq();
        let det = Array1::from_shape_fn(n, |i| det2_complex(&self.z.slice(s![i, .., ..])));
        let det_err = self.z_err.as_ref().map(|e| {
            Array1::from_shape_fn(n, |i| {
                (self.z[[i, 1, 1]].norm() * e[[i, 0, 0]]).abs()
                    + (self.z[[i, 0, 0]].norm() * e[[i, 1, 1]]).abs()
                    + (self.z[[i, 0, 1]].norm() * e[[i, 1, 0]]).abs()
                    + (self.z[[i, 1, 0]].norm() * e[[i, 0, 1]]).abs()
            })
        });
        (det, det_err)
    }

    /// Frobenius norm of Z per index, with a quadrature error estimate
    /// weighting each element error by the element's real and
    /// imaginary parts.
    pub fn norm(&self) -> (Array1<f64>, Option<Array1<f64>>) {
        let n = self.nfreq();
        let norm = Array1::from_shape_fn(n, |i| {
            let mut sum = 0.0;
            for r in 0..2 {
                for c in 0..2 {
                    sum += self.z[[i, r, c]].norm_sqr();
                }
            }
            sum.sqrt()
        });
        let norm_err = self.z_err.as_ref().map(|e| {
            Array1::from_shape_fn(n, |i| {
                let mut radicand = 0.0;
                for r in 0..2 {
                    for c in 0..2 {
                        radicand += (e[[i, r, c]] * self.z[[i, r, c]].re).powi(2);
                        radicand += (e[[i, r, c]] * self.z[[i, r, c]].im).powi(2);
                    }
                }
                radicand.sqrt() / norm[i]
            })
        });
        (norm, norm_err)
    }

    /// The combined set of rotational invariants.
    pub fn invariants(&self) -> Invariants {
        let n = self.nfreq();
        let z1 = Array1::from_shape_fn(n, |i| (self.z[[i, 0, 1]] - self.z[[i, 1, 0]]) / 2.0);
        let (det, _) = self.det();
        let re = self.real();
        let im = self.imag();
        let det_real = Array1::from_shape_fn(n, |i| det2_real(&re.slice(s![i, .., ..])));
        let det_imag = Array1::from_shape_fn(n, |i| det2_real(&im.slice(s![i, .., ..])));
        let (trace, _) = self.trace();
        let (skew, _) = self.skew();
        let (norm, _) = self.norm();

        let lambda_plus =
            Array1::from_shape_fn(n, |i| z1[i] + (z1[i] * z1[i] - det[i]).sqrt());
        let lambda_minus =
            Array1::from_shape_fn(n, |i| z1[i] - (z1[i] * z1[i] - det[i]).sqrt());
        let sigma_plus = Array1::from_shape_fn(n, |i| {
            0.5 * norm[i].powi(2) + (0.25 * norm[i].powi(4) + det[i].norm_sqr()).sqrt()
        });
        let sigma_minus = Array1::from_shape_fn(n, |i| {
            0.5 * norm[i].powi(2) - (0.25 * norm[i].powi(4) + det[i].norm_sqr()).sqrt()
        });

        Invariants {
            z1,
            det,
            det_real,
            det_imag,
            trace,
            skew,
            norm,
            lambda_plus,
            lambda_minus,
            sigma_plus,
            sigma_minus,
        }
    }

    /// Z reduced to 1D form: diagonal zeroed, off-diagonals keep their
    /// signs but share the signed mean of the two original values.
    pub fn only1d(&self) -> Array3<Complex64> {
        let mut out = self.z.clone();
        for i in 0..self.nfreq() {
            let sign01 = complex_sign(out[[i, 0, 1]]);
            let sign10 = complex_sign(out[[i, 1, 0]]);
            let mean = 0.5 * (out[[i, 0, 1]] + out[[i, 1, 0]]);
            out[[i, 0, 0]] = Complex64::new(0.0, 0.0);
            out[[i, 1, 1]] = Complex64::new(0.0, 0.0);
            out[[i, 0, 1]] = sign01 * mean;
            out[[i, 1, 0]] = sign10 * mean;
        }
        out
    }

    /// Z reduced to 2D form: diagonal zeroed, off-diagonals untouched.
    pub fn only2d(&self) -> Array3<Complex64> {
        let mut out = self.z.clone();
        for i in 0..self.nfreq() {
            out[[i, 0, 0]] = Complex64::new(0.0, 0.0);
            out[[i, 1, 1]] = Complex64::new(0.0, 0.0);
        }
        out
    }
}

/// Sign of a complex value: the sign of the real part, falling back to
/// the sign of the imaginary part on the imaginary axis.
fn complex_sign(z: Complex64) -> f64 {
    if z.re != 0.0 {
        z.re.signum()
    } else if z.im != 0.0 {
        z.im.signum()
    } else {
        0.0
    }
}
