//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module parses arguments and dispatches:
//! - `curve`: fetch from Banxico, assemble, print, plot and export
//! - `plot`: re-plot an exported dashboard
//! - `yield` / `price`: one-off valuations

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command, CurveArgs, PlotArgs, PriceArgs, YieldArgs};
use crate::domain::CurveConfig;
use crate::error::AppError;
use crate::models::{NewtonBisection, YieldSolver, coupon_bond_price, discount_price};

pub mod pipeline;

/// Parse the process arguments (with the `curve` default applied).
pub fn parse_cli() -> Cli {
    // `gc` and `gc --date ...` behave like `gc curve ...`. Clap requires a
    // subcommand name, so argv is rewritten before parsing.
    Cli::parse_from(rewrite_args(std::env::args().collect()))
}

/// Entry point for the `gc` binary, after logging is set up.
pub fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Curve(args) => handle_curve(&args),
        Command::Plot(args) => handle_plot(&args),
        Command::Yield(args) => handle_yield(&args),
        Command::Price(args) => handle_price(&args),
    }
}

fn handle_curve(args: &CurveArgs) -> Result<(), AppError> {
    let config = curve_config_from_args(args);
    let dashboard = pipeline::run_dashboard(&config)?;

    println!("{}", crate::report::format_dashboard(&dashboard));

    if config.plot {
        let plot = crate::plot::render_curve_plot(&dashboard.curve, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    if let Some(path) = &config.export_csv {
        crate::io::export::write_curve_csv(path, &dashboard.curve)?;
        info!(path = %path.display(), "curve CSV written");
    }
    if let Some(path) = &config.export_json {
        crate::io::curve::write_dashboard_json(path, &dashboard)?;
        info!(path = %path.display(), "dashboard JSON written");
    }

    Ok(())
}

fn handle_plot(args: &PlotArgs) -> Result<(), AppError> {
    let dashboard = crate::io::curve::read_dashboard_json(&args.curve)?;
    println!("As-of: {}", dashboard.anchor_date);
    println!("{}", crate::plot::render_curve_plot(&dashboard.curve, args.width, args.height));
    Ok(())
}

fn handle_yield(args: &YieldArgs) -> Result<(), AppError> {
    let yld = NewtonBisection::default().solve_yield(args.price, args.dtm, args.coupon)?;
    println!("{yld:.6}");
    Ok(())
}

fn handle_price(args: &PriceArgs) -> Result<(), AppError> {
    let price = match args.coupon {
        Some(coupon) => coupon_bond_price(args.yield_, args.dtm, coupon),
        None => discount_price(args.yield_, args.dtm),
    };
    if !price.is_finite() {
        return Err(AppError::new(2, "Price is not finite for the given inputs."));
    }
    println!("{price:.6}");
    Ok(())
}

pub fn curve_config_from_args(args: &CurveArgs) -> CurveConfig {
    CurveConfig {
        date: args.date,
        catalog: args.catalog.clone(),
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
    }
}

/// Rewrite argv so `gc` defaults to `gc curve`.
///
/// Rules:
/// - `gc`                      -> `gc curve`
/// - `gc --date 2025-10-20`    -> `gc curve --date 2025-10-20`
/// - `gc --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("curve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "curve" | "plot" | "yield" | "price");
    if is_subcommand {
        return argv;
    }

    // A leading flag is a `curve` flag.
    if arg1.starts_with('-') {
        argv.insert(1, "curve".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_curve() {
        assert_eq!(rewrite_args(argv(&["gc"])), argv(&["gc", "curve"]));
    }

    #[test]
    fn leading_flags_go_to_curve() {
        assert_eq!(
            rewrite_args(argv(&["gc", "--date", "2025-10-20"])),
            argv(&["gc", "curve", "--date", "2025-10-20"])
        );
        assert_eq!(rewrite_args(argv(&["gc", "-v"])), argv(&["gc", "curve", "-v"]));
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(argv(&["gc", "plot", "--curve", "d.json"])), argv(&["gc", "plot", "--curve", "d.json"]));
        assert_eq!(rewrite_args(argv(&["gc", "--help"])), argv(&["gc", "--help"]));
    }

    #[test]
    fn config_mirrors_args() {
        let cli = Cli::parse_from(["gc", "curve", "--plot", "--width", "80", "--export-json", "d.json"]);
        let Command::Curve(args) = cli.command else {
            panic!("expected curve command");
        };
        let config = curve_config_from_args(&args);
        assert!(config.plot);
        assert_eq!(config.plot_width, 80);
        assert_eq!(config.plot_height, 25);
        assert_eq!(config.export_json, Some(std::path::PathBuf::from("d.json")));
        assert_eq!(config.date, None);
    }
}
