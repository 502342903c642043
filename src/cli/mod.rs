//! Command-line parsing for the toll-count dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the aggregation/forecasting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::synthetic::DEFAULT_SEED;
use crate::domain::{Category, EPOCH_YEAR, QueryParams};
use crate::error::AppError;
use crate::forecast::{FitOptions, ForecastConfig};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "aforo", version, about = "Monthly toll-road vehicle counts and SARIMA forecasts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print totals, forecast, month table, per-year breakdown and statistics.
    Summary(SummaryArgs),
    /// Fit the model for one category and print (or emit as JSON) the forecast.
    Forecast(ForecastArgs),
    /// List category keys, source columns and icons.
    Categories,
    /// Launch the interactive dashboard.
    ///
    /// Uses the same pipeline as `aforo summary`, rendered with Ratatui.
    Tui(QueryCmdArgs),
}

/// Where the monthly counts come from.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// CSV export with `AÑO`, `MES` and one column per category.
    ///
    /// Defaults to `$AFORO_DATA` (also read from `.env`).
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Use the built-in synthetic dataset instead of a file.
    #[arg(long, conflicts_with = "file")]
    pub demo: bool,

    /// Seed for `--demo`.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Query parameters shared by every dashboard view.
#[derive(Debug, Args, Clone)]
pub struct QueryArgs {
    /// Vehicle category for totals and forecasts.
    #[arg(short = 'v', long, value_enum, default_value_t = Category::Autos)]
    pub vehicle: Category,

    /// First year of the totals range.
    #[arg(long, default_value_t = EPOCH_YEAR)]
    pub from: i32,

    /// Last year of the totals range.
    #[arg(long, default_value_t = 2025)]
    pub to: i32,

    /// Year to forecast and tabulate.
    #[arg(short = 'y', long, default_value_t = 2025)]
    pub year: i32,

    /// Month to forecast and tabulate (1-12).
    #[arg(short = 'm', long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: u32,

    /// Categories for the month table and breakdowns (comma-separated).
    #[arg(long, value_enum, value_delimiter = ',')]
    pub show: Vec<Category>,
}

/// Estimation knobs.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Grid points per coefficient for the initial search.
    #[arg(long, default_value_t = 9)]
    pub grid_steps: usize,

    /// Gauss-Newton refinement iterations after the grid search.
    #[arg(long, default_value_t = 25)]
    pub refine_iters: usize,
}

#[derive(Debug, Args, Clone)]
pub struct QueryCmdArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub query: QueryArgs,

    #[command(flatten)]
    pub fit: FitArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub common: QueryCmdArgs,

    /// Also render an ASCII plot of the series and forecast.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub common: QueryCmdArgs,

    /// Emit the outcome as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl QueryArgs {
    pub fn to_params(&self) -> Result<QueryParams, AppError> {
        if self.from > self.to {
            return Err(AppError::new(
                2,
                format!("`--from` ({}) must not be after `--to` ({}).", self.from, self.to),
            ));
        }
        let mut selected = Vec::with_capacity(self.show.len());
        for c in &self.show {
            if !selected.contains(c) {
                selected.push(*c);
            }
        }
        Ok(QueryParams {
            category: self.vehicle,
            year_from: self.from,
            year_to: self.to,
            year: self.year,
            month: self.month,
            selected,
        })
    }
}

impl FitArgs {
    pub fn to_config(&self) -> ForecastConfig {
        ForecastConfig {
            fit: FitOptions {
                grid_steps: self.grid_steps,
                refine_iters: self.refine_iters,
                ..FitOptions::default()
            },
            ..ForecastConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn summary_flags_map_to_params() {
        let cli = parse(&[
            "aforo", "summary", "--demo", "-v", "camion-5", "--from", "2022", "--to", "2024", "-y", "2026", "-m",
            "2", "--show", "autos,motos,autos",
        ]);
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert!(args.common.data.demo);
        let p = args.common.query.to_params().unwrap();
        assert_eq!(p.category, Category::Camion5);
        assert_eq!((p.year_from, p.year_to, p.year, p.month), (2022, 2024, 2026, 2));
        assert_eq!(p.selected, vec![Category::Autos, Category::Motos]);
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["aforo", "summary", "-m", "13"]).is_err());
        assert!(Cli::try_parse_from(["aforo", "summary", "-m", "0"]).is_err());
    }

    #[test]
    fn inverted_year_range_is_an_input_error() {
        let cli = parse(&["aforo", "forecast", "--from", "2025", "--to", "2021"]);
        let Command::Forecast(args) = cli.command else {
            panic!("expected forecast");
        };
        assert_eq!(args.common.query.to_params().unwrap_err().exit_code(), 2);
    }

    #[test]
    fn demo_conflicts_with_file() {
        assert!(Cli::try_parse_from(["aforo", "tui", "--demo", "-f", "x.csv"]).is_err());
    }

    #[test]
    fn fit_flags_reach_config() {
        let cli = parse(&["aforo", "forecast", "--grid-steps", "5", "--refine-iters", "0"]);
        let Command::Forecast(args) = cli.command else {
            panic!("expected forecast");
        };
        let cfg = args.common.fit.to_config();
        assert_eq!(cfg.fit.grid_steps, 5);
        assert_eq!(cfg.fit.refine_iters, 0);
        assert_eq!(cfg.horizon, 36);
    }
}
