//! Fit quality metrics on held-out data.

use super::{LinalgError, Result};

/// Error summary for one set of predictions.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FitScore {
    pub mse: f64,
    pub rmse: f64,
    pub n: usize,
}

/// Mean squared error `(1/m) Σ (predicted_i - actual_i)²`.
///
/// Fails with `DimensionMismatch` when the lengths differ or both are empty.
pub fn mean_squared_error(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    if predicted.len() != actual.len() {
        return Err(LinalgError::DimensionMismatch {
            context: "predicted vs actual length",
            expected: actual.len(),
            found: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(LinalgError::DimensionMismatch {
            context: "mean squared error needs at least one value",
            expected: 1,
            found: 0,
        });
    }

    let sse: f64 = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a) * (p - a))
        .sum();
    Ok(sse / actual.len() as f64)
}

/// Score predictions against actual values.
pub fn score(predicted: &[f64], actual: &[f64]) -> Result<FitScore> {
    let mse = mean_squared_error(predicted, actual)?;
    Ok(FitScore {
        mse,
        rmse: mse.sqrt(),
        n: actual.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_zero_error() {
        assert_eq!(mean_squared_error(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn known_error() {
        // Squared errors 1, 4, 0 -> 5/3
        let mse = mean_squared_error(&[2.0, 0.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!((mse - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        assert!(matches!(
            mean_squared_error(&[1.0], &[1.0, 2.0]),
            Err(LinalgError::DimensionMismatch { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn empty_is_rejected() {
        assert!(mean_squared_error(&[], &[]).is_err());
    }

    #[test]
    fn score_reports_rmse() {
        let s = score(&[0.0, 0.0], &[3.0, -3.0]).unwrap();
        assert_eq!(s.mse, 9.0);
        assert_eq!(s.rmse, 3.0);
        assert_eq!(s.n, 2);
    }
}
