//! Data acquisition: remote time series, synthetic samples and splitting.

pub mod remote;
pub mod sample;
pub mod split;

pub use remote::{resolve_dataset_url, DatasetClient, DEFAULT_DATASET_URL};
pub use sample::{generate_sample, SampleSpec};
pub use split::split_even_odd;

use crate::domain::Series;
use crate::error::AppError;

/// Reject series that cannot support a fit.
pub fn validate_series(series: &Series) -> Result<(), AppError> {
    if series.t.len() != series.y.len() {
        return Err(AppError::new(
            3,
            format!("Series '{}' has {} t values but {} y values.", series.label, series.t.len(), series.y.len()),
        ));
    }
    if series.len() < 2 {
        return Err(AppError::new(
            3,
            format!("Series '{}' has {} point(s); need at least 2.", series.label, series.len()),
        ));
    }
    if series.t.iter().chain(&series.y).any(|v| !v.is_finite()) {
        return Err(AppError::new(3, format!("Series '{}' contains non-finite values.", series.label)));
    }
    Ok(())
}
