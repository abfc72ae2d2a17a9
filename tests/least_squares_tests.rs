//! Cross-module properties of the least squares kernel.

use approx::assert_abs_diff_eq;
use nalgebra::{DMatrix, DVector};
use proptest::prelude::*;

use poly_lsq::data::split_even_odd;
use poly_lsq::domain::{Method, Series};
use poly_lsq::fit::compare_methods;
use poly_lsq::math::{
    evaluate, evaluate_many, fit_householder, fit_normal_equations, mean_squared_error, solve_lower_triangular,
    solve_upper_triangular, LinalgError,
};

/// Triangular system with diagonal entries spread over sixteen orders of magnitude.
fn triangular_system() -> impl Strategy<Value = (DMatrix<f64>, DVector<f64>, bool)> {
    (1usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(-1.0f64..1.0, n * n),
            prop::collection::vec((-8.0f64..8.0, any::<bool>()), n),
            prop::collection::vec(-10.0f64..10.0, n),
            any::<bool>(),
        )
            .prop_map(move |(off, diag, b, upper)| {
                let mut a = DMatrix::from_vec(n, n, off);
                for (i, &(exp, negative)) in diag.iter().enumerate() {
                    let d = 10f64.powf(exp);
                    a[(i, i)] = if negative { -d } else { d };
                }
                (a, DVector::from_vec(b), upper)
            })
    })
}

/// Overdetermined polynomial data with a nonzero residual.
fn noisy_polynomial() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>)> {
    (1usize..5, 2usize..12).prop_flat_map(|(n, extra)| {
        (
            prop::collection::vec(-3.0f64..3.0, n),
            prop::collection::vec(-0.5f64..0.5, n + extra),
        )
            .prop_map(|(coeffs, noise)| {
                let t: Vec<f64> = (0..noise.len()).map(|i| i as f64 * 0.25 - 1.0).collect();
                let y = evaluate_many(&coeffs, &t)
                    .iter()
                    .zip(&noise)
                    .map(|(v, e)| v + e)
                    .collect();
                (coeffs, t, y)
            })
    })
}

proptest! {
    #[test]
    fn triangular_residual_is_small((a, b, upper) in triangular_system()) {
        let n = a.nrows();
        let (tri, x) = if upper {
            (a.upper_triangle(), solve_upper_triangular(&a, &b).unwrap())
        } else {
            (a.lower_triangle(), solve_lower_triangular(&a, &b).unwrap())
        };
        prop_assert!(x.iter().all(|v| v.is_finite()));
        let residual = &tri * &x - &b;
        // Componentwise backward error of substitution.
        for i in 0..n {
            let row_scale: f64 = (0..n).map(|j| (tri[(i, j)] * x[j]).abs()).sum::<f64>() + b[i].abs();
            prop_assert!(residual[i].abs() <= 1e2 * f64::EPSILON * (n as f64) * row_scale);
        }
    }

    #[test]
    fn methods_agree_on_exact_polynomials(
        coeffs in prop::collection::vec(-3.0f64..3.0, 1..4),
        extra in 0usize..6,
    ) {
        let n = coeffs.len();
        let t: Vec<f64> = (0..n + extra).map(|i| i as f64 * 0.5).collect();
        let y = evaluate_many(&coeffs, &t);

        let normal = fit_normal_equations(n, &t, &y).unwrap();
        let qr = fit_householder(n, &t, &y).unwrap();
        for i in 0..n {
            prop_assert!((normal[i] - coeffs[i]).abs() < 1e-6);
            prop_assert!((qr[i] - coeffs[i]).abs() < 1e-8);
        }
    }

    #[test]
    fn methods_agree_on_noisy_data((coeffs, t, y) in noisy_polynomial()) {
        let n = coeffs.len();
        let normal = fit_normal_equations(n, &t, &y).unwrap();
        let qr = fit_householder(n, &t, &y).unwrap();

        let residual = mean_squared_error(&evaluate_many(qr.as_slice(), &t), &y).unwrap();
        prop_assert!(residual.is_finite());
        for i in 0..n {
            prop_assert!((normal[i] - qr[i]).abs() < 1e-7, "{normal} vs {qr}");
        }
    }

    #[test]
    fn mean_squared_error_is_non_negative(
        pairs in prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 1..50),
    ) {
        let (predicted, actual): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let mse = mean_squared_error(&predicted, &actual).unwrap();
        prop_assert!(mse >= 0.0);
        prop_assert!(mse.is_finite());
        prop_assert_eq!(mean_squared_error(&actual, &actual).unwrap(), 0.0);
    }
}

#[test]
fn line_through_four_points_end_to_end() {
    let t = [1.0, 2.0, 3.0, 4.0];
    let y = [1.0, 3.0, 2.0, 5.0];

    let normal = fit_normal_equations(2, &t, &y).unwrap();
    let qr = fit_householder(2, &t, &y).unwrap();
    assert_abs_diff_eq!(normal[0], 0.0, epsilon = 1e-10);
    assert_abs_diff_eq!(normal[1], 1.1, epsilon = 1e-10);
    assert_abs_diff_eq!(qr[0], 0.0, epsilon = 1e-10);
    assert_abs_diff_eq!(qr[1], 1.1, epsilon = 1e-10);

    let coeffs: Vec<f64> = qr.iter().copied().collect();
    let held_out_t = [1.5, 2.5];
    let held_out_y = [2.0, 2.5];
    let mse = mean_squared_error(&evaluate_many(&coeffs, &held_out_t), &held_out_y).unwrap();
    assert!(mse.is_finite() && mse >= 0.0);
    assert_abs_diff_eq!(mse, (0.35f64.powi(2) + 0.25f64.powi(2)) / 2.0, epsilon = 1e-10);
}

#[test]
fn rank_deficient_inputs_fail_cleanly() {
    // Every column of the design matrix is the same vector of ones.
    let t = [1.0; 4];
    let y = [1.0, 2.0, 3.0, 4.0];
    assert!(matches!(
        fit_normal_equations(3, &t, &y),
        Err(LinalgError::NotPositiveDefinite { index: 1, .. })
    ));
    assert_eq!(
        fit_householder(3, &t, &y),
        Err(LinalgError::DegenerateColumn { column: 1 })
    );
}

#[test]
fn underdetermined_inputs_are_rejected() {
    let t = [1.0, 2.0];
    let y = [1.0, 2.0];
    assert!(matches!(
        fit_householder(3, &t, &y),
        Err(LinalgError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        fit_normal_equations(3, &t, &y),
        Err(LinalgError::DimensionMismatch { .. })
    ));
}

#[test]
fn wide_vandermonde_is_not_flagged_singular_by_scale() {
    // Columns range from 1 to 99^11; full rank despite the spread.
    let t: Vec<f64> = (0..50).map(|i| f64::from(2 * i + 1)).collect();
    let y: Vec<f64> = t.iter().map(|&v| (v / 10.0).sin()).collect();

    let qr = fit_householder(12, &t, &y).unwrap();
    assert!(qr.iter().all(|c| c.is_finite()));

    match fit_normal_equations(12, &t, &y) {
        Ok(x) => assert!(x.iter().all(|c| c.is_finite())),
        Err(LinalgError::SingularMatrix { index, .. }) => assert_ne!(index, 0),
        Err(LinalgError::NotPositiveDefinite { .. }) => {}
        Err(other) => panic!("unexpected failure: {other}"),
    }
}

#[test]
fn fitting_twice_gives_identical_coefficients() {
    let t: Vec<f64> = (1..=30).map(f64::from).collect();
    let y: Vec<f64> = t.iter().map(|&v| (v / 5.0).sin() * 10.0 + v).collect();
    assert_eq!(fit_householder(4, &t, &y).unwrap(), fit_householder(4, &t, &y).unwrap());
    assert_eq!(fit_normal_equations(4, &t, &y).unwrap(), fit_normal_equations(4, &t, &y).unwrap());
}

#[test]
fn comparison_on_noisy_series_scores_both_methods() {
    let t: Vec<f64> = (1..=60).map(f64::from).collect();
    let y: Vec<f64> = t
        .iter()
        .enumerate()
        .map(|(i, &v)| evaluate(&[5.0, 0.3, -0.01], v) + if i % 2 == 0 { 0.2 } else { -0.2 })
        .collect();
    let split = split_even_odd(&Series {
        label: "noisy".to_string(),
        t,
        y,
        dates: Vec::new(),
    });

    let cmp = compare_methods(3, &split);
    for method in Method::ALL {
        let fit = cmp.outcome(method).and_then(|o| o.fit()).unwrap();
        assert!(fit.validation.mse.is_finite());
        assert!(fit.validation.mse < 1.0);
    }
    assert!(cmp.method_agreement().unwrap() < 1e-4);
}
