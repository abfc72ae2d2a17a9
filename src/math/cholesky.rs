//! Least squares via the normal equations and a Cholesky factorization.
//!
//! ```text
//! AᵀA x = Aᵀy,   AᵀA = L Lᵀ
//! L z = Aᵀy      (forward substitution)
//! Lᵀ x = z       (back substitution)
//! ```
//!
//! Forming `AᵀA` squares the condition number of the design matrix, so this
//! route loses accuracy faster than Householder QR as the order grows. It is
//! also cheaper, which is the trade-off the comparison report shows.

use nalgebra::{DMatrix, DVector};

use super::basis::{design_matrix, ensure_paired};
use super::triangular::{solve_lower_triangular, solve_upper_triangular};
use super::{LinalgError, Result};

/// Fit an order-`n` polynomial (degree `n - 1`) to `(t, y)` via normal equations.
pub fn fit_normal_equations(n: usize, t: &[f64], y: &[f64]) -> Result<DVector<f64>> {
    ensure_paired(t, y)?;
    let a = design_matrix(t, n)?;
    let y = DVector::from_column_slice(y);

    let at = a.transpose();
    let ata = &at * &a;
    let aty = &at * &y;

    let l = cholesky_lower(&ata)?;
    let z = solve_lower_triangular(&l, &aty)?;
    solve_upper_triangular(&l.transpose(), &z)
}

/// Factor a symmetric positive definite matrix as `S = L Lᵀ`.
///
/// Only the lower triangle of `S` is read. A pivot `d_j` fails when
/// `d_j <= ε · S_jj` (or is not finite), which covers exact zeros from
/// rank-deficient inputs as well as pivots lost entirely to rounding.
pub fn cholesky_lower(s: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if s.nrows() != s.ncols() {
        return Err(LinalgError::DimensionMismatch {
            context: "Cholesky input (must be square)",
            expected: s.nrows(),
            found: s.ncols(),
        });
    }

    let n = s.nrows();
    let mut l = DMatrix::<f64>::zeros(n, n);

    for j in 0..n {
        let mut d = s[(j, j)];
        for k in 0..j {
            d -= l[(j, k)] * l[(j, k)];
        }

        let tol = s[(j, j)].abs() * f64::EPSILON;
        if !(d > tol) || !d.is_finite() {
            return Err(LinalgError::NotPositiveDefinite { index: j, pivot: d });
        }

        let ljj = d.sqrt();
        l[(j, j)] = ljj;

        for i in (j + 1)..n {
            let mut sum = s[(i, j)];
            for k in 0..j {
                sum -= l[(i, k)] * l[(j, k)];
            }
            l[(i, j)] = sum / ljj;
        }
    }

    Ok(l)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cholesky_reconstructs_input() {
        let s = DMatrix::from_row_slice(3, 3, &[4.0, 12.0, -16.0, 12.0, 37.0, -43.0, -16.0, -43.0, 98.0]);
        let l = cholesky_lower(&s).unwrap();

        // Classic example: L = [[2,0,0],[6,1,0],[-8,5,3]]
        let expected = DMatrix::from_row_slice(3, 3, &[2.0, 0.0, 0.0, 6.0, 1.0, 0.0, -8.0, 5.0, 3.0]);
        assert!((&l - &expected).abs().max() < 1e-12);
        assert!((&l * l.transpose() - &s).abs().max() < 1e-10);
    }

    #[test]
    fn cholesky_rejects_indefinite() {
        let s = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert!(matches!(
            cholesky_lower(&s),
            Err(LinalgError::NotPositiveDefinite { index: 1, .. })
        ));
    }

    #[test]
    fn normal_equations_fit_a_line() {
        let t = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 3.0, 2.0, 5.0];
        let x = fit_normal_equations(2, &t, &y).unwrap();
        assert!(x[0].abs() < 1e-9, "intercept {}", x[0]);
        assert!((x[1] - 1.1).abs() < 1e-9, "slope {}", x[1]);
    }

    #[test]
    fn normal_equations_recover_exact_quadratic() {
        let t: Vec<f64> = (0..10).map(f64::from).collect();
        let y: Vec<f64> = t.iter().map(|&v| 2.0 - 3.0 * v + 0.5 * v * v).collect();
        let x = fit_normal_equations(3, &t, &y).unwrap();
        for (got, want) in x.iter().zip([2.0, -3.0, 0.5]) {
            assert!((got - want).abs() < 1e-8, "got {got}, want {want}");
        }
    }

    #[test]
    fn repeated_abscissa_is_not_positive_definite() {
        let t = [1.0, 1.0, 1.0, 1.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        assert!(matches!(
            fit_normal_equations(2, &t, &y),
            Err(LinalgError::NotPositiveDefinite { index: 1, .. })
        ));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(matches!(
            fit_normal_equations(2, &[1.0, 2.0, 3.0], &[1.0, 2.0]),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }
}
