//! Read/write curve JSON files.
//!
//! Curve JSON is the portable representation of a fitted polynomial:
//! - method, order and coefficients
//! - validation score of the fit
//! - a precomputed fitted grid for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{Comparison, CurveFile, CurveGrid, Method, Series};
use crate::error::AppError;
use crate::math::evaluate;

const GRID_POINTS: usize = 101;

/// Build the curve file for `method` from a comparison.
///
/// Fails with exit code 4 when that method did not produce a fit.
pub fn build_curve_file(series: &Series, cmp: &Comparison, method: Method) -> Result<CurveFile, AppError> {
    let fit = cmp.outcome(method).and_then(|o| o.fit()).ok_or_else(|| {
        AppError::new(
            4,
            format!("No {} fit at order {} to export.", method.display_name(), cmp.order),
        )
    })?;

    let (t_min, t_max) = series
        .stats()
        .map(|s| (s.t_min, s.t_max))
        .unwrap_or((0.0, 1.0));

    Ok(CurveFile {
        tool: "plsq".to_string(),
        generated_at: Utc::now(),
        label: series.label.clone(),
        method,
        order: cmp.order,
        coefficients: fit.coeffs.clone(),
        validation: fit.validation,
        grid: build_grid(&fit.coeffs, t_min, t_max, GRID_POINTS),
    })
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, series: &Series, cmp: &Comparison, method: Method) -> Result<(), AppError> {
    let curve = build_curve_file(series, cmp, method)?;
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    if curve.grid.t.len() != curve.grid.y.len() {
        return Err(AppError::new(2, "Invalid curve JSON: grid t/y lengths differ."));
    }
    Ok(curve)
}

fn build_grid(coeffs: &[f64], t_min: f64, t_max: f64, n: usize) -> CurveGrid {
    let n = n.max(2);
    let mut t0 = t_min;
    let mut t1 = t_max;
    if !(t0.is_finite() && t1.is_finite()) || t1 < t0 {
        t0 = 0.0;
        t1 = 1.0;
    }
    if (t1 - t0).abs() < 1e-9 {
        t0 -= 0.5;
        t1 += 0.5;
    }

    let mut t = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let ti = t0 + u * (t1 - t0);
        t.push(ti);
        y.push(evaluate(coeffs, ti));
    }

    CurveGrid { t, y }
}
