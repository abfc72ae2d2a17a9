//! Synthetic series generation: a known polynomial plus Gaussian noise.
//!
//! Useful offline and for checking that both methods recover the generating
//! coefficients.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::Series;
use crate::error::AppError;
use crate::math::evaluate;

/// Parameters for a synthetic series.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    /// Generating coefficients in ascending powers.
    pub coeffs: Vec<f64>,
    /// Number of points; `t = 1..=days`.
    pub days: usize,
    /// Standard deviation of the additive noise.
    pub sigma: f64,
    pub seed: u64,
}

pub fn generate_sample(spec: &SampleSpec) -> Result<Series, AppError> {
    if spec.days == 0 {
        return Err(AppError::new(2, "Sample size must be > 0."));
    }
    if spec.coeffs.is_empty() || spec.coeffs.iter().any(|c| !c.is_finite()) {
        return Err(AppError::new(2, "Synthetic coefficients must be non-empty and finite."));
    }
    if !(spec.sigma.is_finite() && spec.sigma >= 0.0) {
        return Err(AppError::new(2, "Noise sigma must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let normal = Normal::new(0.0, spec.sigma)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let t: Vec<f64> = (1..=spec.days).map(|i| i as f64).collect();
    let y = t
        .iter()
        .map(|&ti| evaluate(&spec.coeffs, ti) + normal.sample(&mut rng))
        .collect();

    Ok(Series {
        label: format!("synthetic (seed {})", spec.seed),
        t,
        y,
        dates: Vec::new(),
    })
}
