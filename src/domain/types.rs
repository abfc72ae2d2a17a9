//! Shared domain types.
//!
//! These types are lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::math::{FitScore, LinalgError};

/// Least squares method used to produce a coefficient vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Cholesky factorization of `AᵀA`.
    NormalEquations,
    /// Householder QR reduction of `A`.
    Householder,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::NormalEquations, Method::Householder];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Method::NormalEquations => "Normal equations",
            Method::Householder => "Householder",
        }
    }

    /// Compact label for table columns and CSV headers.
    pub fn short_name(self) -> &'static str {
        match self {
            Method::NormalEquations => "normal",
            Method::Householder => "householder",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Method::NormalEquations => Method::Householder,
            Method::Householder => Method::NormalEquations,
        }
    }
}

/// Where the observed series comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Global time-series CSV downloaded over HTTPS.
    Remote,
    /// Local CSV file with a `y` column.
    Csv,
    /// Seeded polynomial plus Gaussian noise.
    Synthetic,
}

/// A paired `(t, y)` series, optionally dated.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub t: Vec<f64>,
    pub y: Vec<f64>,
    /// One date per observation, or empty when the source has no calendar.
    pub dates: Vec<NaiveDate>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Summary stats, or `None` for an empty series.
    pub fn stats(&self) -> Option<SeriesStats> {
        if self.is_empty() {
            return None;
        }
        let (t_min, t_max) = min_max(&self.t);
        let (y_min, y_max) = min_max(&self.y);
        Some(SeriesStats {
            n_points: self.len(),
            t_min,
            t_max,
            y_min,
            y_max,
            first_date: self.dates.first().copied(),
            last_date: self.dates.last().copied(),
        })
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Summary stats about a series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub n_points: usize,
    pub t_min: f64,
    pub t_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Training and validation subsets of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Series,
    pub validation: Series,
}

/// A successful fit by one method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodFit {
    pub coeffs: Vec<f64>,
    /// Score on the validation subset.
    pub validation: FitScore,
    /// Max absolute coefficient difference to the SVD reference, if it solved.
    pub reference_deviation: Option<f64>,
}

/// Outcome of running one method, including failures.
#[derive(Debug, Clone)]
pub struct MethodOutcome {
    pub method: Method,
    pub elapsed: Duration,
    pub result: Result<MethodFit, LinalgError>,
}

impl MethodOutcome {
    pub fn fit(&self) -> Option<&MethodFit> {
        self.result.as_ref().ok()
    }
}

/// Side-by-side results of both methods at one order.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Number of coefficients (polynomial degree + 1).
    pub order: usize,
    pub outcomes: Vec<MethodOutcome>,
    /// SVD reference coefficients, when the reference solver succeeded.
    pub reference: Option<Vec<f64>>,
}

impl Comparison {
    pub fn outcome(&self, method: Method) -> Option<&MethodOutcome> {
        self.outcomes.iter().find(|o| o.method == method)
    }

    /// Largest coefficient difference between the two methods, when both solved.
    pub fn method_agreement(&self) -> Option<f64> {
        let a = self.outcome(Method::NormalEquations)?.fit()?;
        let b = self.outcome(Method::Householder)?.fit()?;
        Some(max_abs_diff(&a.coeffs, &b.coeffs))
    }
}

/// Max absolute element-wise difference of two equal-length slices.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Validation error for one order, per method (used by the order sweep).
#[derive(Debug, Clone)]
pub struct SweepRow {
    pub order: usize,
    pub normal: Result<f64, LinalgError>,
    pub householder: Result<f64, LinalgError>,
}

impl SweepRow {
    pub fn mse(&self, method: Method) -> Option<f64> {
        match method {
            Method::NormalEquations => self.normal.as_ref().ok().copied(),
            Method::Householder => self.householder.as_ref().ok().copied(),
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and `.env`).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub source: SourceKind,
    pub url: String,
    pub csv_path: Option<PathBuf>,
    /// Number of trailing observations to keep.
    pub days: usize,
    /// Number of polynomial coefficients (degree + 1).
    pub order: usize,
    pub seed: u64,
    pub synthetic_coeffs: Vec<f64>,
    pub noise_sigma: f64,

    pub method: Method,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub label: String,
    pub method: Method,
    pub order: usize,
    pub coefficients: Vec<f64>,
    pub validation: FitScore,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub t: Vec<f64>,
    pub y: Vec<f64>,
}
