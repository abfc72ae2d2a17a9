//! Monomial basis and design matrix construction.
//!
//! For an order `n` fit the basis is `1, t, t², …, t^(n-1)`, so the design
//! matrix is the (tall) Vandermonde matrix `A[i][j] = t_i^j`.
//!
//! Both solvers share this builder, and it owns the common preconditions:
//! `n ≥ 1` and `m ≥ n`.

use nalgebra::DMatrix;

use super::{LinalgError, Result};

/// Fill a design row `[1, t, t², …]` for the given order (`out.len()`).
///
/// Powers are built by repeated multiplication so that `t = 0` yields an exact
/// `1` in the first column.
pub fn fill_design_row(t: f64, out: &mut [f64]) {
    let mut p = 1.0;
    for slot in out.iter_mut() {
        *slot = p;
        p *= t;
    }
}

/// Build the `m × n` design matrix for `t` and polynomial order `n`.
pub fn design_matrix(t: &[f64], n: usize) -> Result<DMatrix<f64>> {
    if n == 0 {
        return Err(LinalgError::DimensionMismatch {
            context: "polynomial order",
            expected: 1,
            found: 0,
        });
    }
    let m = t.len();
    if m < n {
        return Err(LinalgError::DimensionMismatch {
            context: "observation count (must be >= order)",
            expected: n,
            found: m,
        });
    }

    let mut a = DMatrix::<f64>::zeros(m, n);
    let mut row = vec![0.0; n];
    for (i, &ti) in t.iter().enumerate() {
        fill_design_row(ti, &mut row);
        for j in 0..n {
            a[(i, j)] = row[j];
        }
    }
    Ok(a)
}

/// Check that `t` and `y` describe the same number of observations.
pub(crate) fn ensure_paired(t: &[f64], y: &[f64]) -> Result<()> {
    if t.len() != y.len() {
        return Err(LinalgError::DimensionMismatch {
            context: "observation vector length (y vs t)",
            expected: t.len(),
            found: y.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_matrix_is_vandermonde() {
        let a = design_matrix(&[0.0, 2.0, -1.0], 3).unwrap();
        assert_eq!(a.nrows(), 3);
        assert_eq!(a.ncols(), 3);
        assert_eq!(a.row(0).iter().copied().collect::<Vec<_>>(), vec![1.0, 0.0, 0.0]);
        assert_eq!(a.row(1).iter().copied().collect::<Vec<_>>(), vec![1.0, 2.0, 4.0]);
        assert_eq!(a.row(2).iter().copied().collect::<Vec<_>>(), vec![1.0, -1.0, 1.0]);
    }

    #[test]
    fn design_matrix_rejects_underdetermined() {
        let err = design_matrix(&[1.0, 2.0], 3).unwrap_err();
        assert!(matches!(
            err,
            LinalgError::DimensionMismatch { expected: 3, found: 2, .. }
        ));
    }

    #[test]
    fn design_matrix_rejects_zero_order() {
        assert!(design_matrix(&[1.0], 0).is_err());
    }

    #[test]
    fn ensure_paired_detects_length_mismatch() {
        assert!(ensure_paired(&[1.0, 2.0], &[1.0, 2.0]).is_ok());
        assert!(ensure_paired(&[1.0, 2.0], &[1.0]).is_err());
    }
}
