//! Local CSV ingest.
//!
//! Turns a two-column-ish CSV into a clean `Series`:
//!
//! - `y` (or `value`) is required
//! - `t` is optional; when missing, `t` is the 1-based row position
//! - `date` is optional and kept only if every used row has one
//!
//! Bad rows are skipped and reported, never silently coerced.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::Series;
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the series plus row accounting.
#[derive(Debug, Clone)]
pub struct IngestedSeries {
    pub series: Series,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load a series from a CSV file, keeping the trailing `days` rows.
pub fn load_series_csv(path: &Path, days: usize) -> Result<IngestedSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    read_series_csv(file, days, &label)
}

/// Parse a series from any CSV reader.
pub fn read_series_csv<R: Read>(reader: R, days: usize, label: &str) -> Result<IngestedSeries, AppError> {
    if days == 0 {
        return Err(AppError::new(2, "Day window must be > 0."));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let y_col = ["y", "value"]
        .iter()
        .find_map(|name| header_map.get(*name).copied())
        .ok_or_else(|| AppError::new(2, "CSV needs a `y` (or `value`) column."))?;
    let t_col = header_map.get("t").copied();
    let date_col = header_map.get("date").copied();

    let mut t = Vec::new();
    let mut y = Vec::new();
    let mut dates: Vec<Option<NaiveDate>> = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines, plus the header line.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, y_col, t_col, date_col, rows_read) {
            Ok((ti, yi, di)) => {
                t.push(ti);
                y.push(yi);
                dates.push(di);
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        log::warn!("skipped {} of {rows_read} CSV rows", row_errors.len());
        for e in row_errors.iter().take(5) {
            log::debug!("line {}: {}", e.line, e.message);
        }
    }

    if t.is_empty() {
        return Err(AppError::new(3, "No valid rows in CSV."));
    }

    let start = t.len().saturating_sub(days);
    let dates: Option<Vec<NaiveDate>> = dates[start..].iter().copied().collect();

    Ok(IngestedSeries {
        series: Series {
            label: label.to_string(),
            t: t[start..].to_vec(),
            y: y[start..].to_vec(),
            dates: dates.unwrap_or_default(),
        },
        row_errors,
        rows_read,
    })
}

fn parse_row(
    record: &StringRecord,
    y_col: usize,
    t_col: Option<usize>,
    date_col: Option<usize>,
    position: usize,
) -> Result<(f64, f64, Option<NaiveDate>), String> {
    let y = parse_f64(get(record, y_col), "y")?;
    let t = match t_col {
        Some(col) => parse_f64(get(record, col), "t")?,
        None => position as f64,
    };
    let date = match date_col.and_then(|col| get(record, col)) {
        Some(raw) => Some(parse_date(raw)?),
        None => None,
    };
    Ok((t, y, date))
}

fn get(record: &StringRecord, col: usize) -> Option<&str> {
    record.get(col).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(raw: Option<&str>, name: &str) -> Result<f64, String> {
    let raw = raw.ok_or_else(|| format!("Missing value for `{name}`"))?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid number for `{name}`: '{raw}'"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite value for `{name}`: '{raw}'"))
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, M/D/YY, M/D/YYYY."
    ))
}
