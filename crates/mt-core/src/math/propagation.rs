//! First-order error propagation
//!
//! Delta-method propagation of per-element standard deviations through
//! the coordinate transforms the impedance-tensor and tipper
//! components apply: rectangular/polar conversion, rotation, and 2x2
//! inversion. This is the leaf layer of the library; it depends on
//! nothing but the analytic linear algebra.

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

use crate::constants::NEAR_ZERO;
use crate::math::linalg::inv2_real;

/// Propagate rectangular standard deviations through
/// `radius = hypot(re, im)`, `angle = atan2(im, re)`.
///
/// Returns `(radius_err, angle_err)` with the angle error in degrees.
/// At the origin the angle is undefined: the radius error degrades to
/// the quadrature of the component errors and the angle error is 0.
pub fn rect_to_polar_error(re: f64, re_err: f64, im: f64, im_err: f64) -> (f64, f64) {
    let radius = re.hypot(im);
    if radius < NEAR_ZERO {
        return (re_err.hypot(im_err), 0.0);
    }
    let radius_err = (re * re_err).hypot(im * im_err) / radius;
    let angle_err = (im * re_err).hypot(re * im_err) / (radius * radius);
    (radius_err, angle_err.to_degrees())
}

/// Propagate polar standard deviations through
/// `x = radius * cos(angle)`, `y = radius * sin(angle)`.
///
/// `angle_deg` and `angle_err_deg` are in degrees. Returns `(x_err, y_err)`.
pub fn polar_to_rect_error(
    radius: f64,
    radius_err: f64,
    angle_deg: f64,
    angle_err_deg: f64,
) -> (f64, f64) {
    let phi = angle_deg.to_radians();
    let phi_err = angle_err_deg.to_radians();
    let x_err = (phi.cos() * radius_err).hypot(radius * phi.sin() * phi_err);
    let y_err = (phi.sin() * radius_err).hypot(radius * phi.cos() * phi_err);
    (x_err, y_err)
}

/// Rotate a complex 2x2 matrix by `angle_deg`, clockwise positive from
/// geographic north, via the conjugation `R M R^T` with
/// `R = [[cos, sin], [-sin, cos]]`.
///
/// Per-element standard deviations are propagated by quadrature of the
/// partial derivatives. `m` must be 2x2.
pub fn rotate_matrix_with_errors(
    m: &ArrayView2<Complex64>,
    angle_deg: f64,
    m_err: Option<&ArrayView2<f64>>,
) -> (Array2<Complex64>, Option<Array2<f64>>) {
    debug_assert_eq!(m.dim(), (2, 2));

    let phi = angle_deg.rem_euclid(360.0).to_radians();
    let c = phi.cos();
    let s = phi.sin();
    let (cc, ss, cs) = (c * c, s * s, c * s);

    let (m00, m01, m10, m11) = (m[[0, 0]], m[[0, 1]], m[[1, 0]], m[[1, 1]]);

    let mut rotated = Array2::<Complex64>::zeros((2, 2));
    rotated[[0, 0]] = cc * m00 + cs * m01 + cs * m10 + ss * m11;
    rotated[[0, 1]] = -cs * m00 + cc * m01 - ss * m10 + cs * m11;
    rotated[[1, 0]] = -cs * m00 - ss * m01 + cc * m10 + cs * m11;
    rotated[[1, 1]] = ss * m00 - cs * m01 - cs * m10 + cc * m11;

    let rotated_err = m_err.map(|err| {
        debug_assert_eq!(err.dim(), (2, 2));
        let (e00, e01, e10, e11) = (err[[0, 0]], err[[0, 1]], err[[1, 0]], err[[1, 1]]);
        let mut out = Array2::<f64>::zeros((2, 2));
        out[[0, 0]] = quad4(cc * e00, cs * e01, cs * e10, ss * e11);
        out[[0, 1]] = quad4(cs * e00, cc * e01, ss * e10, cs * e11);
        out[[1, 0]] = quad4(cs * e00, ss * e01, cc * e10, cs * e11);
        out[[1, 1]] = quad4(ss * e00, cs * e01, cs * e10, cc * e11);
        out
    });

    (rotated, rotated_err)
}

/// Rotate a 1x2 row vector by `angle_deg`, clockwise positive from
/// geographic north, with error propagation.
///
/// Returns `((vx', vy'), Some((vx_err', vy_err')))` when errors are given.
pub fn rotate_vector_with_errors(
    vx: Complex64,
    vy: Complex64,
    angle_deg: f64,
    errors: Option<(f64, f64)>,
) -> ((Complex64, Complex64), Option<(f64, f64)>) {
    let phi = angle_deg.rem_euclid(360.0).to_radians();
    let c = phi.cos();
    let s = phi.sin();

    let rotated = (c * vx + s * vy, -s * vx + c * vy);
    let rotated_err = errors.map(|(ex, ey)| ((c * ex).hypot(s * ey), (s * ex).hypot(c * ey)));

    (rotated, rotated_err)
}

/// Invert a real 2x2 matrix, bounding the element errors of the
/// inverse with the one-norm of `delta(A^-1) = -A^-1 dA A^-1`.
///
/// Returns `None` if the matrix is singular.
pub fn invert_matrix_with_errors(
    m: &ArrayView2<f64>,
    m_err: Option<&ArrayView2<f64>>,
) -> Option<(Array2<f64>, Option<Array2<f64>>)> {
    let inv = inv2_real(m)?;

    let inv_err = m_err.map(|err| {
        let mut out = Array2::<f64>::zeros((2, 2));
        for i in 0..2 {
            for j in 0..2 {
                let mut bound = 0.0;
                for k in 0..2 {
                    for l in 0..2 {
                        bound += (inv[[i, k]] * inv[[l, j]] * err[[k, l]]).abs();
                    }
                }
                out[[i, j]] = bound;
            }
        }
        out
    });

    Some((inv, inv_err))
}

#[inline]
fn quad4(a: f64, b: f64, c: f64, d: f64) -> f64 {
    (a * a + b * b + c * c + d * d).sqrt()
}
