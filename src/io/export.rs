//! Export per-point predictions to CSV.
//!
//! One row per observation, tagged with the subset it belongs to, so the file
//! is easy to consume in spreadsheets or downstream scripts.

use std::io::Write;
use std::path::Path;

use crate::domain::{Comparison, Method, Series, Split};
use crate::error::AppError;
use crate::math::evaluate;

/// Write per-point results to a CSV file.
pub fn write_results_csv(path: &Path, split: &Split, cmp: &Comparison) -> Result<(), AppError> {
    let writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(writer, split, cmp)
}

/// Write per-point results to any CSV writer.
pub fn write_results<W: Write>(mut writer: csv::Writer<W>, split: &Split, cmp: &Comparison) -> Result<(), AppError> {
    writer
        .write_record(["set", "t", "y", "pred_normal", "pred_householder"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    let normal = coeffs_for(cmp, Method::NormalEquations);
    let qr = coeffs_for(cmp, Method::Householder);

    for (set, series) in [("train", &split.train), ("validation", &split.validation)] {
        write_rows(&mut writer, set, series, normal, qr)?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

fn write_rows<W: Write>(
    writer: &mut csv::Writer<W>,
    set: &str,
    series: &Series,
    normal: Option<&[f64]>,
    qr: Option<&[f64]>,
) -> Result<(), AppError> {
    for (&t, &y) in series.t.iter().zip(&series.y) {
        // Failed methods leave their prediction column empty.
        let predict = |c: Option<&[f64]>| c.map(|c| format!("{:.10}", evaluate(c, t))).unwrap_or_default();
        writer
            .write_record([
                set.to_string(),
                format!("{t}"),
                format!("{y}"),
                predict(normal),
                predict(qr),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}

fn coeffs_for(cmp: &Comparison, method: Method) -> Option<&[f64]> {
    cmp.outcome(method)
        .and_then(|o| o.fit())
        .map(|fit| fit.coeffs.as_slice())
}
