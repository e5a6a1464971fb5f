//! Sensor orientation correction
//!
//! An impedance tensor measured with misaligned electric (E) and
//! magnetic (B) sensor pairs satisfies `E' = Z' B'` in the instrument
//! frame. With change-of-basis matrices T (electric) and U (magnetic)
//! built from the sensor azimuths, the tensor in the geographic frame
//! is `Z = T Z' U^-1`.

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

use crate::error::TensorError;
use crate::math::linalg::inv2_real;

/// Correct a single 2x2 impedance tensor for misoriented sensors.
///
/// `bx`, `by`, `ex`, `ey` are the sensor azimuths in degrees clockwise
/// from geographic north (an ideal setup is 0, 90, 0, 90). The error
/// array, when given, is passed through unchanged; its propagation
/// through the basis change is not implemented.
pub fn correct_sensor_orientation(
    z: &ArrayView2<Complex64>,
    bx: f64,
    by: f64,
    ex: f64,
    ey: f64,
    z_err: Option<&ArrayView2<f64>>,
) -> Result<(Array2<Complex64>, Option<Array2<f64>>), TensorError> {
    if z.dim() != (2, 2) {
        return Err(TensorError::InvalidShape {
            expected: "(2, 2)",
            got: z.shape().to_vec(),
        });
    }

    let t = basis_from_azimuths(ex, ey);
    let u = basis_from_azimuths(bx, by);
    let u_inv = inv2_real(&u.view()).ok_or_else(|| {
        TensorError::InvalidArgument(
            "magnetic sensor angles do not span 2 dimensions".to_string(),
        )
    })?;

    // Z = T * Z' * U^-1, expanded term by term over the real matrices
    let mut corrected = Array2::<Complex64>::zeros((2, 2));
    for r in 0..2 {
        for c in 0..2 {
            let mut sum = Complex64::new(0.0, 0.0);
            for k in 0..2 {
                for l in 0..2 {
                    sum += t[[r, k]] * z[[k, l]] * u_inv[[l, c]];
                }
            }
            corrected[[r, c]] = sum;
        }
    }

    Ok((corrected, z_err.map(|e| e.to_owned())))
}

/// Columns are the unit vectors of the two sensor directions.
fn basis_from_azimuths(first_deg: f64, second_deg: f64) -> Array2<f64> {
    let (s1, c1) = first_deg.to_radians().sin_cos();
    let (s2, c2) = second_deg.to_radians().sin_cos();
    ndarray::array![[c1, c2], [s1, s2]]
}
