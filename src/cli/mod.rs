//! Command-line parsing for the Banxico government curve tool.
//!
//! Argument parsing and command dispatch stay separate from the curve core.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gc", version, about = "Mexican Government Yield Curve (Banxico SIE)")]
pub struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the curve and summary indicators, print them, and optionally plot/export.
    Curve(CurveArgs),
    /// Plot a previously exported dashboard JSON.
    Plot(PlotArgs),
    /// Yield of a coupon bond from its dirty price.
    Yield(YieldArgs),
    /// Price of a bill, or of a coupon bond when `--coupon` is given.
    Price(PriceArgs),
}

#[derive(Debug, Args, Clone)]
pub struct CurveArgs {
    /// Build the curve for this date (YYYY-MM-DD) instead of the latest one.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Series catalog TOML replacing the bundled one.
    #[arg(long, value_name = "TOML")]
    pub catalog: Option<PathBuf>,

    /// Render an ASCII plot of the curve.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the curve to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the dashboard (curve + summary) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for plotting a saved dashboard.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Dashboard JSON file produced by `gc curve --export-json`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Args)]
pub struct YieldArgs {
    /// Dirty price per 100 nominal.
    #[arg(long)]
    pub price: f64,

    /// Days to maturity.
    #[arg(long)]
    pub dtm: i64,

    /// Annual coupon rate in percent.
    #[arg(long)]
    pub coupon: f64,
}

#[derive(Debug, Args)]
pub struct PriceArgs {
    /// Annual yield in percent.
    #[arg(long = "yield")]
    pub yield_: f64,

    /// Days to maturity.
    #[arg(long)]
    pub dtm: i64,

    /// Annual coupon rate in percent; omit for a zero-coupon bill.
    #[arg(long)]
    pub coupon: Option<f64>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
