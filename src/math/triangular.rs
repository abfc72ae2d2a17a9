//! Back and forward substitution for square triangular systems.
//!
//! Only the relevant triangle of `A` is read; entries on the other side of the
//! diagonal are ignored. This lets callers pass the top block of a Householder
//! reduction directly, where the "zeroed" part holds floating-point noise.
//!
//! Singularity is checked up front, pivot by pivot, against the entries that
//! share its column (upper) or row (lower) inside the triangle:
//!
//! ```text
//! upper: |a_ii| <= n · ε · max_{j <= i} |a_ji|
//! lower: |a_ii| <= n · ε · max_{j <= i} |a_ij|
//! ```
//!
//! The two forms look at the same numbers for `L` and `Lᵀ`, and neither is
//! affected by rescaling a column of `R` or a row of `L`, so badly scaled but
//! full-rank systems still solve.

use nalgebra::{DMatrix, DVector};

use super::{LinalgError, Result};

/// Solve `A x = b` for upper triangular `A`, from the last row upward.
pub fn solve_upper_triangular(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    check_shapes(a, b)?;
    check_diagonal(a, Triangle::Upper)?;

    let n = a.nrows();
    let mut x = DVector::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += a[(i, j)] * x[j];
        }
        x[i] = (b[i] - sum) / a[(i, i)];
    }
    Ok(x)
}

/// Solve `A x = b` for lower triangular `A`, from the first row downward.
pub fn solve_lower_triangular(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    check_shapes(a, b)?;
    check_diagonal(a, Triangle::Lower)?;

    let n = a.nrows();
    let mut x = DVector::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += a[(i, j)] * x[j];
        }
        x[i] = (b[i] - sum) / a[(i, i)];
    }
    Ok(x)
}

fn check_shapes(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<()> {
    if a.nrows() != a.ncols() {
        return Err(LinalgError::DimensionMismatch {
            context: "triangular matrix (must be square)",
            expected: a.nrows(),
            found: a.ncols(),
        });
    }
    if b.len() != a.nrows() {
        return Err(LinalgError::DimensionMismatch {
            context: "right-hand side length",
            expected: a.nrows(),
            found: b.len(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Triangle {
    Upper,
    Lower,
}

fn check_diagonal(a: &DMatrix<f64>, triangle: Triangle) -> Result<()> {
    let n = a.nrows();
    let eps = n as f64 * f64::EPSILON;

    for i in 0..n {
        let d = a[(i, i)];
        let local = (0..=i)
            .map(|j| match triangle {
                Triangle::Upper => a[(j, i)],
                Triangle::Lower => a[(i, j)],
            })
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        // Written as a negated comparison so NaN fails as well.
        if !(d.abs() > eps * local) || !d.is_finite() || !local.is_finite() {
            return Err(LinalgError::SingularMatrix { index: i, value: d });
        }
    }
    Ok(())
}
