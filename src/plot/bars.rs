//! Horizontal bar chart of per-method solve times.

use crate::domain::Comparison;
use crate::report::fmt_duration;

const LABEL_WIDTH: usize = 16;

/// One bar per method, scaled so the slowest method spans `width` cells.
pub fn render_timing_bars(cmp: &Comparison, width: usize) -> String {
    let width = width.max(1);
    let slowest = cmp
        .outcomes
        .iter()
        .map(|o| o.elapsed.as_secs_f64())
        .fold(0.0_f64, f64::max);

    let mut out = String::from("Solve time\n");
    for outcome in &cmp.outcomes {
        let secs = outcome.elapsed.as_secs_f64();
        let len = if slowest > 0.0 {
            ((secs / slowest) * width as f64).round() as usize
        } else {
            0
        };
        // Any measurable time gets at least one cell.
        let len = if secs > 0.0 { len.max(1) } else { len };
        let status = if outcome.result.is_err() { " (failed)" } else { "" };
        out.push_str(&format!(
            "{:<label_width$} {:<width$} {}{status}\n",
            outcome.method.display_name(),
            "#".repeat(len),
            fmt_duration(outcome.elapsed),
            label_width = LABEL_WIDTH,
        ));
    }
    out
}
