//! Remote global time-series CSV (JHU CSSE COVID-19 layout).
//!
//! The file has one row per region and one column per day:
//!
//! ```text
//! Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,...
//! ```
//!
//! We drop the location columns, sum every day column across rows and keep the
//! trailing `days` totals as `y`, with `t = 1..=days`.

use std::io::Read;

use chrono::NaiveDate;
use reqwest::blocking::Client;

use crate::domain::Series;
use crate::error::AppError;

pub const DEFAULT_DATASET_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_deaths_global.csv";

/// Environment variable overriding the default dataset URL (also read from `.env`).
pub const DATASET_URL_ENV: &str = "PLSQ_DATASET_URL";

const LOCATION_COLUMNS: [&str; 4] = ["Province/State", "Country/Region", "Lat", "Long"];

pub struct DatasetClient {
    client: Client,
    url: String,
}

/// Resolve the dataset URL: `url_override`, else `$PLSQ_DATASET_URL` (`.env` included), else the default.
pub fn resolve_dataset_url(url_override: Option<&str>) -> String {
    dotenvy::dotenv().ok();
    url_override
        .map(str::to_string)
        .or_else(|| std::env::var(DATASET_URL_ENV).ok())
        .unwrap_or_else(|| DEFAULT_DATASET_URL.to_string())
}

impl DatasetClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the CSV and aggregate its trailing `days` columns.
    pub fn fetch_series(&self, days: usize) -> Result<Series, AppError> {
        log::info!("fetching dataset from {}", self.url);

        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::new(4, format!("Dataset request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Dataset request failed with status {}.", resp.status()),
            ));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::new(4, format!("Failed to read dataset body: {e}")))?;
        log::debug!("downloaded {} bytes", body.len());

        parse_time_series_csv(body.as_bytes(), days, &label_from_url(&self.url))
    }
}

/// Parse a wide time-series CSV into a summed series of the trailing `days` columns.
pub fn parse_time_series_csv<R: Read>(reader: R, days: usize, label: &str) -> Result<Series, AppError> {
    if days == 0 {
        return Err(AppError::new(2, "Day window must be > 0."));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(4, format!("Failed to read dataset headers: {e}")))?
        .clone();

    let value_columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !LOCATION_COLUMNS.contains(&name.trim_start_matches('\u{feff}')))
        .collect();

    if value_columns.is_empty() {
        return Err(AppError::new(3, "Dataset has no value columns."));
    }

    let mut totals = vec![0.0_f64; value_columns.len()];
    let mut rows = 0usize;
    let mut skipped_cells = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| AppError::new(4, format!("Dataset parse error at line {}: {e}", idx + 2)))?;
        rows += 1;
        for (slot, &(col, _)) in value_columns.iter().enumerate() {
            match record.get(col).and_then(parse_cell) {
                Some(v) => totals[slot] += v,
                None => skipped_cells += 1,
            }
        }
    }

    if rows == 0 {
        return Err(AppError::new(3, "Dataset has no rows."));
    }
    if skipped_cells > 0 {
        log::warn!("skipped {skipped_cells} empty or non-numeric cells while aggregating");
    }

    let keep = days.min(totals.len());
    if keep < days {
        log::warn!("dataset has only {} value columns; using all of them", totals.len());
    }
    let start = totals.len() - keep;

    let y = totals[start..].to_vec();
    let t = (1..=keep).map(|i| i as f64).collect();
    let dates: Vec<NaiveDate> = value_columns[start..]
        .iter()
        .filter_map(|(_, name)| parse_header_date(name))
        .collect();
    // Only keep dates when every column parsed, so they stay aligned with `y`.
    let dates = if dates.len() == keep { dates } else { Vec::new() };

    Ok(Series {
        label: label.to_string(),
        t,
        y,
        dates,
    })
}

fn parse_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_header_date(name: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(name.trim(), "%m/%d/%y").ok()
}

fn label_from_url(url: &str) -> String {
    url.rsplit('/')
        .next()
        .map(|s| s.trim_end_matches(".csv"))
        .filter(|s| !s.is_empty())
        .unwrap_or("remote")
        .to_string()
}
