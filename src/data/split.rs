//! Train/validation partitioning.

use crate::domain::{Series, Split};

/// Even (0-based) indices train, odd indices validate.
///
/// Interleaving keeps both subsets spread over the whole `t` range, so the
/// validation error measures fit quality rather than extrapolation.
pub fn split_even_odd(series: &Series) -> Split {
    let pick = |parity: usize| -> Series {
        let keep = |i: &usize| i % 2 == parity;
        let idx: Vec<usize> = (0..series.len()).filter(keep).collect();
        Series {
            label: series.label.clone(),
            t: idx.iter().map(|&i| series.t[i]).collect(),
            y: idx.iter().map(|&i| series.y[i]).collect(),
            dates: if series.dates.len() == series.len() {
                idx.iter().map(|&i| series.dates[i]).collect()
            } else {
                Vec::new()
            },
        }
    };

    Split {
        train: pick(0),
        validation: pick(1),
    }
}
