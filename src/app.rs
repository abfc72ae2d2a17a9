//! Top-level application orchestration.
//!
//! `src/main.rs` is tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the series (remote CSV, local CSV or synthetic)
//! - runs the method comparison or the order sweep
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, FitArgs, PlotArgs, SourceArgs, SweepArgs};
use crate::domain::{FitConfig, SourceKind};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `plsq` binary.
pub fn run() -> Result<(), AppError> {
    // `plsq` and `plsq --source synthetic` behave like `plsq tui ...`.
    //
    // Clap requires a subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Sweep(args) => handle_sweep(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    println!(
        "{}",
        crate::report::format_comparison(&run.series, &run.split, &run.comparison)
    );
    println!("{}", crate::plot::render_timing_bars(&run.comparison, 40));

    if config.plot {
        let coeffs = run
            .comparison
            .outcome(config.method)
            .and_then(|o| o.fit())
            .map(|fit| fit.coeffs.as_slice());
        if coeffs.is_none() {
            log::warn!("{} has no fit to plot; showing data only", config.method.display_name());
        }
        let plot = crate::plot::render_ascii_plot(&run.split, coeffs, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.split, &run.comparison)?;
        log::info!("wrote results to {}", path.display());
    }
    if let Some(path) = &config.export_curve {
        crate::io::curve::write_curve_json(path, &run.series, &run.comparison, config.method)?;
        log::info!("wrote curve to {}", path.display());
    }

    Ok(())
}

fn handle_sweep(args: SweepArgs) -> Result<(), AppError> {
    let config = config_from_source(&args.source);
    let (series, rows) = pipeline::run_sweep(&config, args.max_order)?;
    println!("{}", crate::report::format_sweep(&series, &rows));
    Ok(())
}

fn handle_tui(args: FitArgs) -> Result<(), AppError> {
    crate::tui::run(fit_config_from_args(&args))
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;

    println!(
        "{} | {} | order={} | x={} | MSE={:.6}",
        curve.label,
        curve.method.display_name(),
        curve.order,
        crate::report::fmt_coeffs(&curve.coefficients),
        curve.validation.mse,
    );
    let plot = crate::plot::render_curve_file(&curve, args.width, args.height);
    println!("{plot}");
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        order: args.order,
        method: args.method,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_curve: args.export_curve.clone(),
        ..config_from_source(&args.source)
    }
}

fn config_from_source(source: &SourceArgs) -> FitConfig {
    // Only the remote source needs a URL; skip the `.env` lookup otherwise.
    let url = match source.source {
        SourceKind::Remote => crate::data::resolve_dataset_url(source.url.as_deref()),
        _ => source.url.clone().unwrap_or_default(),
    };
    FitConfig {
        source: source.source,
        url,
        csv_path: source.csv.clone(),
        days: source.days,
        order: 1,
        seed: source.seed,
        synthetic_coeffs: source.coeffs.clone(),
        noise_sigma: source.sigma,
        method: crate::domain::Method::Householder,
        plot: false,
        plot_width: 100,
        plot_height: 25,
        export_results: None,
        export_curve: None,
    }
}

/// Rewrite argv so `plsq` defaults to `plsq tui`.
///
/// Rules:
/// - `plsq`                       -> `plsq tui`
/// - `plsq --source csv ...`      -> `plsq tui --source csv ...`
/// - `plsq --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "sweep" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
