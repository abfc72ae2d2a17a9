//! Validation error across a range of polynomial orders.
//!
//! Each order is independent, so the orders are fitted in parallel.

use rayon::prelude::*;

use crate::domain::{Method, Split, SweepRow};
use crate::error::AppError;
use crate::fit::compare::validation_mse;

/// Fit orders `1..=max_order` with both methods and record the validation MSE.
///
/// Rows come back sorted by order. Orders larger than the training set are
/// skipped since they cannot be fitted.
pub fn sweep_orders(max_order: usize, split: &Split) -> Result<Vec<SweepRow>, AppError> {
    if max_order == 0 {
        return Err(AppError::new(2, "Maximum order must be >= 1."));
    }
    let limit = max_order.min(split.train.len());
    if limit < max_order {
        log::warn!(
            "training set has {} points; sweeping orders 1..={limit} only",
            split.train.len()
        );
    }
    if limit == 0 {
        return Err(AppError::new(3, "Training set is empty."));
    }

    let mut rows: Vec<SweepRow> = (1..=limit)
        .into_par_iter()
        .map(|order| SweepRow {
            order,
            normal: validation_mse(Method::NormalEquations, order, split),
            householder: validation_mse(Method::Householder, order, split),
        })
        .collect();

    rows.sort_by_key(|r| r.order);
    Ok(rows)
}

/// Order with the lowest validation MSE for `method`; ties go to the lower order.
pub fn best_order(rows: &[SweepRow], method: Method) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for row in rows {
        let Some(mse) = row.mse(method) else {
            continue;
        };
        if !mse.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if mse >= b => {}
            _ => best = Some((row.order, mse)),
        }
    }
    best.map(|(order, _)| order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::split_even_odd;
    use crate::domain::Series;

    fn quadratic_split() -> Split {
        let t: Vec<f64> = (1..=20).map(f64::from).collect();
        let y = t.iter().map(|&v| 3.0 - 0.5 * v + 0.1 * v * v).collect();
        split_even_odd(&Series {
            label: "quad".to_string(),
            t,
            y,
            dates: Vec::new(),
        })
    }

    #[test]
    fn rows_are_ordered_and_complete() {
        let rows = sweep_orders(4, &quadratic_split()).unwrap();
        let orders: Vec<usize> = rows.iter().map(|r| r.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
        assert!(rows.iter().all(|r| r.householder.is_ok()));
    }

    #[test]
    fn exact_quadratic_is_best_at_order_three_or_above() {
        let rows = sweep_orders(4, &quadratic_split()).unwrap();
        let mse3 = rows[2].mse(Method::Householder).unwrap();
        assert!(mse3 < 1e-12);
        assert!(rows[1].mse(Method::Householder).unwrap() > 1e-3);
        let best = best_order(&rows, Method::Householder).unwrap();
        assert!(best >= 3);
    }

    #[test]
    fn order_is_capped_by_training_size() {
        let split = split_even_odd(&Series {
            label: "tiny".to_string(),
            t: vec![1.0, 2.0, 3.0, 4.0],
            y: vec![1.0, 2.0, 3.0, 5.0],
            dates: Vec::new(),
        });
        let rows = sweep_orders(5, &split).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn best_order_skips_failures() {
        let rows = vec![
            SweepRow {
                order: 1,
                normal: Ok(4.0),
                householder: Ok(4.0),
            },
            SweepRow {
                order: 2,
                normal: Err(crate::math::LinalgError::NotPositiveDefinite { index: 1, pivot: 0.0 }),
                householder: Ok(1.0),
            },
        ];
        assert_eq!(best_order(&rows, Method::NormalEquations), Some(1));
        assert_eq!(best_order(&rows, Method::Householder), Some(2));
    }
}
