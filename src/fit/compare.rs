//! Run both least squares methods on the same training data and score them.
//!
//! Each method is timed on its own; a failure in one method is recorded in its
//! outcome and does not stop the other.

use std::time::{Duration, Instant};

use crate::domain::{max_abs_diff, Comparison, Method, MethodFit, MethodOutcome, Split};
use crate::math::{evaluate_many, fit_householder, fit_normal_equations, fit_reference, score, LinalgError};

/// Fit the training subset with one method (no scoring).
pub fn fit_with(method: Method, order: usize, t: &[f64], y: &[f64]) -> Result<Vec<f64>, LinalgError> {
    let coeffs = match method {
        Method::NormalEquations => fit_normal_equations(order, t, y)?,
        Method::Householder => fit_householder(order, t, y)?,
    };
    Ok(coeffs.iter().copied().collect())
}

/// Fit with `method` on the training subset and return the validation MSE.
pub fn validation_mse(method: Method, order: usize, split: &Split) -> Result<f64, LinalgError> {
    let coeffs = fit_with(method, order, &split.train.t, &split.train.y)?;
    let predicted = evaluate_many(&coeffs, &split.validation.t);
    crate::math::mean_squared_error(&predicted, &split.validation.y)
}

/// Compare both methods at `order` on `split`.
pub fn compare_methods(order: usize, split: &Split) -> Comparison {
    let train = &split.train;

    let reference = match fit_reference(order, &train.t, &train.y) {
        Ok(Some(beta)) => Some(beta.iter().copied().collect::<Vec<f64>>()),
        Ok(None) => {
            log::debug!("SVD reference did not converge at order {order}");
            None
        }
        Err(e) => {
            log::debug!("SVD reference rejected order {order}: {e}");
            None
        }
    };

    let outcomes = Method::ALL
        .iter()
        .map(|&method| {
            let (result, elapsed) = timed(|| fit_with(method, order, &train.t, &train.y));
            let result = result.and_then(|coeffs| {
                let predicted = evaluate_many(&coeffs, &split.validation.t);
                let validation = score(&predicted, &split.validation.y)?;
                let reference_deviation = reference.as_ref().map(|r| max_abs_diff(&coeffs, r));
                Ok(MethodFit {
                    coeffs,
                    validation,
                    reference_deviation,
                })
            });
            if let Err(e) = &result {
                log::info!("{} failed at order {order}: {e}", method.display_name());
            }
            MethodOutcome {
                method,
                elapsed,
                result,
            }
        })
        .collect();

    Comparison {
        order,
        outcomes,
        reference,
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}
