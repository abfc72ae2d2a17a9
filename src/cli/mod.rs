//! Command-line parsing for the polynomial least squares comparator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the numerical code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Method, SourceKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "plsq",
    version,
    about = "Polynomial least squares: normal equations vs Householder QR"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit one order with both methods, print the comparison, and optionally plot/export.
    Fit(FitArgs),
    /// Validation MSE for every order up to `--max-order`.
    Sweep(SweepArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// Uses the same fit pipeline as `plsq fit`, rendered with Ratatui.
    Tui(FitArgs),
}

/// Where the series comes from and how much of it to use.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Data source.
    #[arg(long, value_enum, default_value_t = SourceKind::Remote)]
    pub source: SourceKind,

    /// Remote dataset URL (overrides PLSQ_DATASET_URL).
    #[arg(long)]
    pub url: Option<String>,

    /// Local CSV file (used with `--source csv`).
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Number of trailing observations to keep.
    #[arg(short = 'd', long, default_value_t = 100)]
    pub days: usize,

    /// Random seed for the synthetic source.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Generating coefficients for the synthetic source (ascending powers).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "2,-0.5,0.03")]
    pub coeffs: Vec<f64>,

    /// Noise standard deviation for the synthetic source.
    #[arg(long, default_value_t = 1.0)]
    pub sigma: f64,
}

/// Options for fitting one order.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Number of polynomial coefficients (degree + 1).
    #[arg(short = 'n', long, default_value_t = 5)]
    pub order: usize,

    /// Method whose curve is plotted and exported.
    #[arg(long, value_enum, default_value_t = Method::Householder)]
    pub method: Method,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-point predictions to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the fitted curve (coefficients + grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,
}

/// Options for the order sweep.
#[derive(Debug, Args, Clone)]
pub struct SweepArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Largest order to fit.
    #[arg(long, default_value_t = 10)]
    pub max_order: usize,
}

/// Options for plotting a saved curve.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Curve JSON file produced by `plsq fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults() {
        let cli = Cli::parse_from(["plsq", "fit"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.order, 5);
        assert_eq!(args.source.days, 100);
        assert_eq!(args.source.source, SourceKind::Remote);
        assert_eq!(args.source.coeffs, vec![2.0, -0.5, 0.03]);
        assert!(args.plot && !args.no_plot);
    }

    #[test]
    fn synthetic_coefficients_accept_negatives() {
        let cli = Cli::parse_from([
            "plsq", "sweep", "--source", "synthetic", "--coeffs", "-1,0.5", "--max-order", "4",
        ]);
        let Command::Sweep(args) = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(args.source.source, SourceKind::Synthetic);
        assert_eq!(args.source.coeffs, vec![-1.0, 0.5]);
        assert_eq!(args.max_order, 4);
    }

    #[test]
    fn method_parses_kebab_case() {
        let cli = Cli::parse_from(["plsq", "tui", "--method", "normal-equations"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(args.method, Method::NormalEquations);
    }
}
