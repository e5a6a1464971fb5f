//! Impedance tensor transformation tests
//!
//! Rotation semantics, per-frequency inversion, static-shift removal
//! and galvanic distortion removal.

use approx::assert_relative_eq;
use mt_core::{CaptureSink, ImpedanceTensor, TensorError};
use ndarray::{array, s, Array1, Array3};
use num_complex::Complex64;

fn sample_tensor(n: usize, with_errors: bool) -> ImpedanceTensor {
    let mut z = Array3::<Complex64>::zeros((n, 2, 2));
    for i in 0..n {
        let scale = 1.0 + i as f64;
        z[[i, 0, 0]] = Complex64::new(0.3 * scale, -0.2);
        z[[i, 0, 1]] = Complex64::new(9.0 * scale, 6.0);
        z[[i, 1, 0]] = Complex64::new(-8.0 * scale, -5.0);
        z[[i, 1, 1]] = Complex64::new(-0.4, 0.25 * scale);
    }
    let z_err = with_errors.then(|| Array3::<f64>::from_elem((n, 2, 2), 0.1));
    let freq = Array1::from_iter((0..n).map(|i| 100.0 / (1.0 + i as f64)));
    ImpedanceTensor::new(z, z_err, Some(freq)).unwrap()
}

fn assert_tensors_close(a: &Array3<Complex64>, b: &Array3<Complex64>, eps: f64) {
    assert_eq!(a.dim(), b.dim());
    for i in 0..a.dim().0 {
        for r in 0..2 {
            for c in 0..2 {
                assert_relative_eq!(
                    a[[i, r, c]].re,
                    b[[i, r, c]].re,
                    epsilon = eps,
                    max_relative = 1e-9
                );
                assert_relative_eq!(
                    a[[i, r, c]].im,
                    b[[i, r, c]].im,
                    epsilon = eps,
                    max_relative = 1e-9
                );
            }
        }
    }
}

// ============================================================================
// Rotation
// ============================================================================

#[test]
fn test_rotation_by_zero_is_identity() {
    let mut tensor = sample_tensor(3, true);
    let before = tensor.tensor().clone();
    tensor.rotate(0.0);
    assert_tensors_close(tensor.tensor(), &before, 1e-14);
    assert_eq!(tensor.rotation_angle()[0], 0.0);
}

#[test]
fn test_rotation_by_360_is_identity() {
    let mut tensor = sample_tensor(2, false);
    let before = tensor.tensor().clone();
    tensor.rotate(360.0);
    assert_tensors_close(tensor.tensor(), &before, 1e-12);
    assert_relative_eq!(tensor.rotation_angle()[0], 0.0, epsilon = 1e-12);
}

#[test]
fn test_rotation_composes_additively() {
    let mut once = sample_tensor(2, true);
    let mut twice = sample_tensor(2, true);

    once.rotate(75.0);
    twice.rotate(30.0);
    twice.rotate(45.0);

    assert_tensors_close(once.tensor(), twice.tensor(), 1e-9);
    assert_relative_eq!(
        once.rotation_angle()[0],
        twice.rotation_angle()[0],
        epsilon = 1e-10
    );
}

#[test]
fn test_rotation_angle_accumulates_mod_360() {
    let mut tensor = sample_tensor(1, false);
    tensor.rotate(350.0);
    tensor.rotate(20.0);
    assert_relative_eq!(tensor.rotation_angle()[0], 10.0, epsilon = 1e-10);
}

#[test]
fn test_rotation_per_index_angles() {
    let mut tensor = sample_tensor(2, false);
    tensor.rotate(vec![90.0, 0.0]);

    // index 0 rotated by 90 degrees: Zxx -> Zyy
    let rotated = tensor.tensor();
    let original = sample_tensor(2, false);
    assert_relative_eq!(
        rotated[[0, 0, 0]].re,
        original.tensor()[[0, 1, 1]].re,
        epsilon = 1e-12
    );
    // index 1 untouched
    assert_relative_eq!(
        rotated[[1, 0, 1]].re,
        original.tensor()[[1, 0, 1]].re,
        epsilon = 1e-12
    );
}

#[test]
fn test_rotation_wrong_count_is_logged_noop() {
    let sink = CaptureSink::new();
    let mut tensor = sample_tensor(3, false).with_sink(sink.clone());
    let before = tensor.tensor().clone();

    tensor.rotate(vec![10.0, 20.0]);

    assert_tensors_close(tensor.tensor(), &before, 0.0);
    assert_eq!(tensor.rotation_angle()[0], 0.0);
    assert_eq!(sink.messages().len(), 1);
}

#[test]
fn test_rotation_recomputes_resistivity() {
    let mut tensor = sample_tensor(1, false);
    let before = tensor.resistivity().unwrap().clone();
    tensor.rotate(45.0);
    let after = tensor.resistivity().unwrap();
    assert!((after[[0, 0, 1]] - before[[0, 0, 1]]).abs() > 1e-6);
}

// ============================================================================
// Inversion
// ============================================================================

#[test]
fn test_inverse_times_tensor_is_identity() {
    let tensor = sample_tensor(2, false);
    let inv = tensor.inverse().unwrap();
    for i in 0..2usize {
        let product = inv
            .slice(s![i, .., ..])
            .dot(&tensor.tensor().slice(s![i, .., ..]));
        assert_relative_eq!(product[[0, 0]].re, 1.0, epsilon = 1e-10);
        assert_relative_eq!(product[[1, 1]].re, 1.0, epsilon = 1e-10);
        assert_relative_eq!(product[[0, 1]].norm(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(product[[1, 0]].norm(), 0.0, epsilon = 1e-10);
    }
}

#[test]
fn test_inverse_reports_singular_index() {
    let mut z = Array3::<Complex64>::zeros((2, 2, 2));
    z[[0, 0, 1]] = Complex64::new(1.0, 0.0);
    z[[0, 1, 0]] = Complex64::new(-1.0, 0.0);
    // index 1 left all-zero, hence singular
    let tensor = ImpedanceTensor::new(z, None, None).unwrap();
    match tensor.inverse() {
        Err(TensorError::SingularMatrix { index }) => assert_eq!(index, 1),
        other => panic!("expected singular matrix at index 1, got {:?}", other.is_ok()),
    }
}

// ============================================================================
// Static shift
// ============================================================================

#[test]
fn test_static_shift_reapplication_reconstructs_tensor() {
    let tensor = sample_tensor(2, false);
    let (shift, corrected) = tensor.remove_static_shift(4.0, 2.25).unwrap();

    // reapply S * Z0 and compare with the original
    let mut reconstructed = corrected.clone();
    for i in 0..2 {
        for c in 0..2 {
            reconstructed[[i, 0, c]] = shift[[i, 0, 0]] * corrected[[i, 0, c]];
            reconstructed[[i, 1, c]] = shift[[i, 1, 1]] * corrected[[i, 1, c]];
        }
    }
    assert_tensors_close(&reconstructed, tensor.tensor(), 1e-12);

    // and the shift matrix carries the square roots
    assert_relative_eq!(shift[[0, 0, 0]], 2.0, epsilon = 1e-12);
    assert_relative_eq!(shift[[0, 1, 1]], 1.5, epsilon = 1e-12);
}

#[test]
fn test_static_shift_does_not_mutate_self() {
    let tensor = sample_tensor(1, false);
    let before = tensor.tensor().clone();
    let _ = tensor.remove_static_shift(4.0, 4.0).unwrap();
    assert_tensors_close(tensor.tensor(), &before, 0.0);
}

#[test]
fn test_static_shift_wrong_count_is_logged_none() {
    let sink = CaptureSink::new();
    let tensor = sample_tensor(3, false).with_sink(sink.clone());
    assert!(tensor
        .remove_static_shift(vec![1.0, 2.0], 1.0)
        .is_none());
    assert_eq!(sink.messages().len(), 1);
}

// ============================================================================
// Distortion removal
// ============================================================================

#[test]
fn test_distortion_identity_preserves_tensor_and_error() {
    let tensor = sample_tensor(2, true);
    let eye = array![[1.0, 0.0], [0.0, 1.0]];
    let (d, corrected, corrected_err) = tensor.remove_distortion(&eye, None).unwrap();

    assert_eq!(d, eye);
    assert_tensors_close(&corrected, tensor.tensor(), 1e-14);
    let corrected_err = corrected_err.unwrap();
    for i in 0..2 {
        for r in 0..2 {
            for c in 0..2 {
                assert_relative_eq!(corrected_err[[i, r, c]], 0.1, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn test_distortion_removal_inverts_applied_distortion() {
    let clean = sample_tensor(1, false);
    let d = array![[1.2, 0.5], [0.35, 2.1]];

    // apply the distortion: Z = D * Z0
    let mut distorted = Array3::<Complex64>::zeros((1, 2, 2));
    for r in 0..2 {
        for c in 0..2 {
            distorted[[0, r, c]] = d[[r, 0]] * clean.tensor()[[0, 0, c]]
                + d[[r, 1]] * clean.tensor()[[0, 1, c]];
        }
    }
    let observed = ImpedanceTensor::new(distorted, None, None).unwrap();

    let (_, recovered, _) = observed.remove_distortion(&d, None).unwrap();
    assert_tensors_close(&recovered, clean.tensor(), 1e-10);
}

#[test]
fn test_distortion_singular_matrix_is_fatal() {
    let tensor = sample_tensor(1, false);
    let singular = array![[2.0, 4.0], [1.0, 2.0]];
    assert!(matches!(
        tensor.remove_distortion(&singular, None),
        Err(TensorError::SingularDistortion)
    ));
}

#[test]
fn test_distortion_wrong_shape_is_fatal() {
    let tensor = sample_tensor(1, false);
    let bad = ndarray::Array2::<f64>::zeros((3, 3));
    assert!(matches!(
        tensor.remove_distortion(&bad, None),
        Err(TensorError::InvalidShape { .. })
    ));
}
