//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the numerical code stays clean and testable
//! - output changes are localized
//!
//! Coefficients are printed rounded to [`DISPLAY_DECIMALS`]; solvers always
//! work at full precision.

use std::time::Duration;

use crate::domain::{Comparison, Method, Series, Split, SweepRow};
use crate::fit::best_order;

/// Decimal digits shown for coefficients.
pub const DISPLAY_DECIMALS: i32 = 5;

/// Round to `digits` decimal places (presentation only).
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    let rounded = (value * scale).round() / scale;
    // Very large magnitudes overflow the scaled value; show them as-is.
    if rounded.is_finite() { rounded } else { value }
}

/// Format the dataset header and the per-method comparison.
pub fn format_comparison(series: &Series, split: &Split, cmp: &Comparison) -> String {
    let mut out = String::new();

    out.push_str("=== plsq - polynomial least squares ===\n");
    out.push_str(&format_series_line(series));
    out.push_str(&format!(
        "Split: train={} | validation={} | order={} (degree {})\n",
        split.train.len(),
        split.validation.len(),
        cmp.order,
        cmp.order.saturating_sub(1),
    ));

    for outcome in &cmp.outcomes {
        out.push('\n');
        out.push_str(&format!("{}\n", outcome.method.display_name()));
        match &outcome.result {
            Ok(fit) => {
                out.push_str(&format!("  x    = {}\n", fmt_coeffs(&fit.coeffs)));
                out.push_str(&format!(
                    "  MSE  = {:.6} (rmse {:.6}, n={})\n",
                    fit.validation.mse, fit.validation.rmse, fit.validation.n
                ));
                if let Some(dev) = fit.reference_deviation {
                    out.push_str(&format!("  |x - x_svd|max = {dev:.3e}\n"));
                }
            }
            Err(err) => {
                out.push_str(&format!("  failed: {err}\n"));
            }
        }
        out.push_str(&format!("  time = {}\n", fmt_duration(outcome.elapsed)));
    }

    out.push('\n');
    match cmp.method_agreement() {
        Some(diff) => out.push_str(&format!("Method agreement: max |Δx| = {diff:.3e}\n")),
        None => out.push_str("Method agreement: n/a (a method failed)\n"),
    }

    out
}

/// Format the order sweep table.
pub fn format_sweep(series: &Series, rows: &[SweepRow]) -> String {
    let mut out = String::new();
    out.push_str("=== plsq - order sweep (validation MSE) ===\n");
    out.push_str(&format_series_line(series));
    out.push('\n');

    let best_normal = best_order(rows, Method::NormalEquations);
    let best_qr = best_order(rows, Method::Householder);

    out.push_str(&format!("{:>5} {:>18} {:>18}\n", "order", "normal", "householder"));
    out.push_str(&format!("{:->5} {:->18} {:->18}\n", "", "", ""));
    for row in rows {
        out.push_str(&format!(
            "{:>5} {:>18} {:>18}\n",
            row.order,
            fmt_mse_cell(row.mse(Method::NormalEquations), best_normal == Some(row.order)),
            fmt_mse_cell(row.mse(Method::Householder), best_qr == Some(row.order)),
        ));
    }
    out.push_str("(* = lowest validation MSE for that method; - = fit failed)\n");
    out
}

fn format_series_line(series: &Series) -> String {
    match series.stats() {
        Some(stats) => {
            let dates = match (stats.first_date, stats.last_date) {
                (Some(a), Some(b)) => format!(" | dates={a}..{b}"),
                _ => String::new(),
            };
            format!(
                "Series: {} | n={} | t=[{:.2}, {:.2}] | y=[{:.2}, {:.2}]{dates}\n",
                series.label, stats.n_points, stats.t_min, stats.t_max, stats.y_min, stats.y_max
            )
        }
        None => format!("Series: {} | empty\n", series.label),
    }
}

fn fmt_mse_cell(mse: Option<f64>, best: bool) -> String {
    match mse {
        Some(v) => format!("{v:.6e}{}", if best { "*" } else { " " }),
        None => "- ".to_string(),
    }
}

/// Format a coefficient vector at display precision.
pub fn fmt_coeffs(v: &[f64]) -> String {
    let parts: Vec<String> = v
        .iter()
        .map(|&x| format!("{}", round_to(x, DISPLAY_DECIMALS)))
        .collect();
    format!("[{}]", parts.join(", "))
}

pub fn fmt_duration(d: Duration) -> String {
    let micros = d.as_secs_f64() * 1e6;
    if micros < 1000.0 {
        format!("{micros:.1}µs")
    } else {
        format!("{:.3}ms", micros / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::compare_methods;

    fn series() -> Series {
        Series {
            label: "line".to_string(),
            t: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            y: vec![1.0, 2.0, 3.0, 5.0, 5.0],
            dates: Vec::new(),
        }
    }

    #[test]
    fn round_to_five_digits() {
        assert_eq!(round_to(1.234_567_89, 5), 1.23457);
        assert_eq!(round_to(-0.000_004, 5), -0.0);
        assert_eq!(round_to(1e305, 5), 1e305);
    }

    #[test]
    fn coefficients_are_rounded_for_display() {
        assert_eq!(fmt_coeffs(&[0.1 + 0.2, 2.0]), "[0.3, 2]");
    }

    #[test]
    fn comparison_mentions_both_methods() {
        let s = series();
        let split = crate::data::split_even_odd(&s);
        let cmp = compare_methods(2, &split);
        let text = format_comparison(&s, &split, &cmp);
        assert!(text.contains("Normal equations"));
        assert!(text.contains("Householder"));
        assert!(text.contains("Method agreement"));
    }

    #[test]
    fn comparison_shows_failures_inline() {
        let s = Series {
            label: "flat".to_string(),
            t: vec![1.0, 2.0, 1.0, 2.0, 1.0],
            y: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            dates: Vec::new(),
        };
        let split = crate::data::split_even_odd(&s);
        let cmp = compare_methods(2, &split);
        let text = format_comparison(&s, &split, &cmp);
        assert!(text.contains("failed:"));
        assert!(text.contains("n/a"));
    }

    #[test]
    fn sweep_table_marks_best() {
        let rows = vec![
            SweepRow {
                order: 1,
                normal: Ok(2.0),
                householder: Ok(2.0),
            },
            SweepRow {
                order: 2,
                normal: Ok(1.0),
                householder: Ok(3.0),
            },
        ];
        let text = format_sweep(&series(), &rows);
        let lines: Vec<&str> = text.lines().collect();
        let row1 = lines.iter().find(|l| l.trim_start().starts_with("1 ")).unwrap();
        let row2 = lines.iter().find(|l| l.trim_start().starts_with("2 ")).unwrap();
        assert!(row1.matches('*').count() == 1);
        assert!(row2.matches('*').count() == 1);
    }

    #[test]
    fn durations_switch_units() {
        assert_eq!(fmt_duration(Duration::from_micros(250)), "250.0µs");
        assert_eq!(fmt_duration(Duration::from_micros(2500)), "2.500ms");
    }
}
