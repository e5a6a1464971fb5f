//! Analytic 2x2 linear algebra
//!
//! Every matrix in this library is 2x2, so determinants and inverses
//! are written out in closed form instead of going through a general
//! linear-algebra backend.

use ndarray::{array, Array2, ArrayView2};
use num_complex::Complex64;

use crate::constants::NEAR_ZERO;

/// Determinant of a complex 2x2 matrix.
#[inline]
pub fn det2_complex(m: &ArrayView2<Complex64>) -> Complex64 {
    m[[0, 0]] * m[[1, 1]] - m[[0, 1]] * m[[1, 0]]
}

/// Determinant of a real 2x2 matrix.
#[inline]
pub fn det2_real(m: &ArrayView2<f64>) -> f64 {
    m[[0, 0]] * m[[1, 1]] - m[[0, 1]] * m[[1, 0]]
}

/// Inverse of a complex 2x2 matrix.
///
/// Returns `None` if the matrix is singular.
pub fn inv2_complex(m: &ArrayView2<Complex64>) -> Option<Array2<Complex64>> {
    let det = det2_complex(m);
    if det.norm() < NEAR_ZERO {
        return None;
    }
    Some(array![
        [m[[1, 1]] / det, -m[[0, 1]] / det],
        [-m[[1, 0]] / det, m[[0, 0]] / det],
    ])
}

/// Inverse of a real 2x2 matrix.
///
/// Returns `None` if the matrix is singular.
pub fn inv2_real(m: &ArrayView2<f64>) -> Option<Array2<f64>> {
    let det = det2_real(m);
    if det.abs() < NEAR_ZERO {
        return None;
    }
    Some(array![
        [m[[1, 1]] / det, -m[[0, 1]] / det],
        [-m[[1, 0]] / det, m[[0, 0]] / det],
    ])
}
