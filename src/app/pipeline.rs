//! Shared "fit pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load series -> validate -> even/odd split -> compare methods (or sweep orders)
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::data::{generate_sample, split_even_odd, validate_series, DatasetClient, SampleSpec};
use crate::domain::{Comparison, FitConfig, Series, SourceKind, Split, SweepRow};
use crate::error::AppError;
use crate::fit::{compare_methods, sweep_orders};

/// All computed outputs of a single `plsq fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: Series,
    pub split: Split,
    pub comparison: Comparison,
}

/// Load the configured series and reject it if it cannot support a fit.
pub fn load_series(config: &FitConfig) -> Result<Series, AppError> {
    let series = match config.source {
        SourceKind::Remote => {
            let client = DatasetClient::new(config.url.clone());
            client.fetch_series(config.days)?
        }
        SourceKind::Csv => {
            let path = config
                .csv_path
                .as_deref()
                .ok_or_else(|| AppError::new(2, "`--source csv` requires `--csv <FILE>`."))?;
            let ingested = crate::io::load_series_csv(path, config.days)?;
            log::info!(
                "read {} rows from {} ({} skipped)",
                ingested.rows_read,
                path.display(),
                ingested.row_errors.len()
            );
            ingested.series
        }
        SourceKind::Synthetic => generate_sample(&SampleSpec {
            coeffs: config.synthetic_coeffs.clone(),
            days: config.days,
            sigma: config.noise_sigma,
            seed: config.seed,
        })?,
    };

    validate_series(&series)?;
    log::info!("loaded series '{}' with {} points", series.label, series.len());
    Ok(series)
}

/// Split `series` and compare both methods at `order`.
pub fn fit_series(series: Series, order: usize) -> Result<RunOutput, AppError> {
    if order == 0 {
        return Err(AppError::new(2, "Order must be >= 1."));
    }
    let split = split_even_odd(&series);
    if split.train.len() < order {
        log::warn!(
            "order {order} exceeds the {} training points; both methods will fail",
            split.train.len()
        );
    }
    let comparison = compare_methods(order, &split);
    Ok(RunOutput {
        series,
        split,
        comparison,
    })
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let series = load_series(config)?;
    fit_series(series, config.order)
}

/// Load, split and sweep orders `1..=max_order`.
pub fn run_sweep(config: &FitConfig, max_order: usize) -> Result<(Series, Vec<SweepRow>), AppError> {
    let series = load_series(config)?;
    let split = split_even_odd(&series);
    let rows = sweep_orders(max_order, &split)?;
    Ok((series, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Method;

    fn synthetic_config() -> FitConfig {
        FitConfig {
            source: SourceKind::Synthetic,
            url: String::new(),
            csv_path: None,
            days: 40,
            order: 3,
            seed: 7,
            synthetic_coeffs: vec![1.0, -0.2, 0.05],
            noise_sigma: 0.0,
            method: Method::Householder,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_results: None,
            export_curve: None,
        }
    }

    #[test]
    fn noiseless_synthetic_run_recovers_coefficients() {
        let run = run_fit(&synthetic_config()).unwrap();
        assert_eq!(run.split.train.len(), 20);
        assert_eq!(run.split.validation.len(), 20);
        for outcome in &run.comparison.outcomes {
            let fit = outcome.fit().unwrap();
            for (got, want) in fit.coeffs.iter().zip([1.0, -0.2, 0.05]) {
                assert!((got - want).abs() < 1e-6, "{:?}", fit.coeffs);
            }
            assert!(fit.validation.mse < 1e-8);
        }
    }

    #[test]
    fn csv_source_requires_a_path() {
        let mut config = synthetic_config();
        config.source = SourceKind::Csv;
        assert_eq!(run_fit(&config).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn zero_order_is_rejected() {
        let series = load_series(&synthetic_config()).unwrap();
        assert_eq!(fit_series(series, 0).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn sweep_returns_one_row_per_order() {
        let (series, rows) = run_sweep(&synthetic_config(), 6).unwrap();
        assert_eq!(series.len(), 40);
        assert_eq!(rows.len(), 6);
    }
}
