//! Polynomial evaluation for fitted coefficient vectors.
//!
//! Coefficients are in ascending powers: `x[0] + x[1]·t + … + x[n-1]·t^(n-1)`.

/// Evaluate the polynomial at a single point (Horner's scheme).
pub fn evaluate(coeffs: &[f64], t: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
}

/// Evaluate the polynomial at every point of `ts`.
pub fn evaluate_many(coeffs: &[f64], ts: &[f64]) -> Vec<f64> {
    ts.iter().map(|&t| evaluate(coeffs, t)).collect()
}
