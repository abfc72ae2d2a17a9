//! Numerical kernel: triangular solves, normal equations, Householder QR,
//! polynomial evaluation and fit scoring.
//!
//! Everything in here is synchronous, allocation-local and side-effect free.
//! Failures are returned as [`LinalgError`]; nothing in this module prints or logs.

pub mod basis;
pub mod cholesky;
pub mod householder;
pub mod ols;
pub mod poly;
pub mod quality;
pub mod triangular;

pub use basis::*;
pub use cholesky::*;
pub use householder::*;
pub use ols::*;
pub use poly::*;
pub use quality::*;
pub use triangular::*;

/// Structured failures of the numerical kernel.
///
/// All of these are detected before any numerically unsafe step (division by a
/// zero pivot, square root of a negative pivot, reflection through a zero vector).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinalgError {
    /// A triangular system has a (numerically) zero diagonal entry.
    #[error("Matrix is singular: diagonal entry {index} is {value:e}")]
    SingularMatrix {
        /// Row/column of the offending diagonal entry.
        index: usize,
        /// The diagonal value that failed the check.
        value: f64,
    },

    /// Cholesky factorization hit a non-positive pivot.
    ///
    /// For normal equations this means the design matrix is rank-deficient
    /// (too few distinct `t` values for the requested order).
    #[error("Matrix is not positive definite: pivot {index} is {pivot:e}")]
    NotPositiveDefinite {
        /// Column at which the factorization broke down.
        index: usize,
        /// The pivot value that failed the check.
        pivot: f64,
    },

    /// A Householder reflection vector has zero norm.
    #[error("Column {column} is degenerate; the design matrix is rank-deficient for this order")]
    DegenerateColumn {
        /// Column being reduced when the reflection degenerated.
        column: usize,
    },

    /// Input sizes disagree with the operation's preconditions.
    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Which argument or relation was violated.
        context: &'static str,
        /// The expected size (or lower bound).
        expected: usize,
        /// The size actually supplied.
        found: usize,
    },
}

/// Result type for the numerical kernel.
pub type Result<T> = std::result::Result<T, LinalgError>;
