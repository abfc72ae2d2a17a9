//! Least squares via Householder QR.
//!
//! The design matrix `A` (m × n) and the observations `b` are reduced together
//! by `n` reflections `H_i = I - 2 v vᵀ / vᵀv`. Afterwards the top `n × n`
//! block of `A` is upper triangular and `b[..n]` is the transformed right-hand
//! side, so a single back substitution gives the coefficients. `AᵀA` is never
//! formed.
//!
//! `A` and `b` are local working buffers built from the caller's slices; the
//! reduction mutates them in place and drops them on return.

use nalgebra::{DMatrix, DVector};

use super::basis::{design_matrix, ensure_paired};
use super::triangular::solve_upper_triangular;
use super::{LinalgError, Result};

/// Fit an order-`n` polynomial (degree `n - 1`) to `(t, y)` via Householder QR.
pub fn fit_householder(n: usize, t: &[f64], y: &[f64]) -> Result<DVector<f64>> {
    ensure_paired(t, y)?;
    let mut a = design_matrix(t, n)?;
    let mut b = DVector::from_column_slice(y);
    let m = a.nrows();

    // Sub-column norms are compared against the original column norms.
    let col_norms: Vec<f64> = (0..n).map(|j| a.column(j).norm()).collect();
    let degenerate_tol = m as f64 * f64::EPSILON;

    let mut v = DVector::<f64>::zeros(m);

    for i in 0..n {
        let norm_a = a.view((i, i), (m - i, 1)).norm();
        if !(norm_a > degenerate_tol * col_norms[i]) {
            return Err(LinalgError::DegenerateColumn { column: i });
        }

        // Pick the sign opposite to the pivot so `a[i] - alfa` never cancels.
        let alfa = if a[(i, i)] < 0.0 { norm_a } else { -norm_a };

        v.fill(0.0);
        for j in i..m {
            v[j] = a[(j, i)];
        }
        v[i] -= alfa;

        let vtv = v.norm_squared();
        if !(vtv > 0.0) {
            return Err(LinalgError::DegenerateColumn { column: i });
        }

        for k in 0..n {
            let vtx = v.dot(&a.column(k));
            a.column_mut(k).axpy(-2.0 * vtx / vtv, &v, 1.0);
        }

        let vtx = v.dot(&b);
        b.axpy(-2.0 * vtx / vtv, &v, 1.0);
    }

    let r = a.view((0, 0), (n, n)).into_owned();
    let rhs = b.rows(0, n).into_owned();
    solve_upper_triangular(&r, &rhs)
}
