//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - loads the dataset (CSV or synthetic)
//! - runs the dashboard pipeline
//! - prints reports/plots or starts the TUI

use std::io;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Command, DataArgs, ForecastArgs, QueryCmdArgs, SummaryArgs};
use crate::data::synthetic::{SyntheticConfig, demo_dataset};
use crate::domain::{Category, QueryParams};
use crate::error::AppError;
use crate::forecast::{ForecastOutcome, forecast_series};
use crate::normalize::Dataset;

pub mod pipeline;

/// Environment variable holding the default CSV path.
pub const DATA_ENV: &str = "AFORO_DATA";

/// Entry point for the `aforo` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    // We want `aforo` and `aforo -f data.csv` to behave like `aforo tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_tracing(matches!(cli.command, Command::Tui(_)));

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Forecast(args) => handle_forecast(args),
        Command::Categories => {
            print!("{}", crate::report::format_categories());
            Ok(())
        }
        Command::Tui(args) => handle_tui(args),
    }
}

/// Logs go to stderr for CLI commands; the TUI owns the terminal, so it gets a sink.
fn init_tracing(tui: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "aforo_forecast=warn".into());
    let registry = tracing_subscriber::registry().with(filter);
    let result = if tui {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::sink))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init()
    };
    // Already initialized (e.g. in tests); keep the existing subscriber.
    let _ = result;
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let (dataset, params, config) = prepare(&args.common)?;
    let mut session = pipeline::Session::new(&dataset, config);
    let summary = session.summary(&params);

    let cadence = crate::query::cadence_label(&dataset, params.category, params.year_from, params.year_to);
    println!(
        "{}",
        crate::report::format_summary(&dataset, &params, summary, cadence, &config)
    );
    println!("{}", crate::report::format_month_table(&summary.table));
    println!(
        "{}",
        crate::report::format_yearly(&crate::query::yearly_breakdown(
            &dataset,
            &params.selected,
            params.year_from,
            params.year_to
        ))
    );
    println!(
        "{}",
        crate::report::format_breakdown(
            &crate::query::category_breakdown(&dataset, &params.selected, params.year),
            params.year
        )
    );
    print!(
        "{}",
        crate::report::format_extremes(
            &crate::query::extremes(&dataset, &params.selected, params.year),
            params.year
        )
    );

    if args.plot {
        let split = match &summary.forecast {
            ForecastOutcome::Fitted { train_len, .. } => Some(*train_len),
            _ => None,
        };
        let plot = crate::plot::render_series_plot(
            &summary.series,
            summary.forecast.points(),
            split,
            args.width,
            args.height,
        );
        println!("\n{plot}");
    }
    Ok(())
}

/// JSON shape of `aforo forecast --json`.
#[derive(Debug, Serialize)]
struct ForecastReport<'a> {
    category: Category,
    column: &'static str,
    model: String,
    year: i32,
    month: u32,
    value: i64,
    outcome: &'a ForecastOutcome,
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let (dataset, params, config) = prepare(&args.common)?;
    let series = crate::aggregate::monthly_series(&dataset, params.category);
    let outcome = forecast_series(&series, &config);
    let value = outcome.value_for(params.year, params.month);

    if args.json {
        let report = ForecastReport {
            category: params.category,
            column: params.category.column_name(),
            model: config.order.display_name(),
            year: params.year,
            month: params.month,
            value,
            outcome: &outcome,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::new(4, format!("Failed to serialize forecast: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "{} {}-{:02}: {}",
        params.category.display_name(),
        params.year,
        params.month,
        crate::report::format_int(value)
    );
    print!("{}", crate::report::format_outcome(&outcome, &config));
    if !outcome.points().is_empty() {
        println!();
        print!("{}", crate::report::format_forecast_points(outcome.points()));
    }
    Ok(())
}

fn handle_tui(args: QueryCmdArgs) -> Result<(), AppError> {
    let (dataset, params, config) = prepare(&args)?;
    crate::tui::run(&dataset, config, params)
}

fn prepare(args: &QueryCmdArgs) -> Result<(Dataset, QueryParams, crate::forecast::ForecastConfig), AppError> {
    let params = args.query.to_params()?;
    let config = args.fit.to_config();
    let dataset = load_data(&args.data)?;
    if !dataset.dropped().is_empty() {
        warn!(dropped = dataset.dropped().len(), "some rows were dropped during ingest");
        for e in dataset.dropped() {
            debug!(line = e.line, message = %e.message, "dropped row");
        }
    }
    Ok((dataset, params, config))
}

/// Resolve the data source: `--demo`, then `--file`, then `$AFORO_DATA`.
pub fn load_data(args: &DataArgs) -> Result<Dataset, AppError> {
    if args.demo {
        return demo_dataset(&SyntheticConfig {
            seed: args.seed,
            ..SyntheticConfig::default()
        });
    }

    let path = match &args.file {
        Some(p) => p.clone(),
        None => std::env::var_os(DATA_ENV).map(PathBuf::from).ok_or_else(|| {
            AppError::new(
                2,
                format!("No data file. Pass `-f <file.csv>`, set `{DATA_ENV}`, or use `--demo`."),
            )
        })?,
    };
    crate::io::ingest::load_dataset(&path)
}

/// Rewrite argv so `aforo` defaults to `aforo tui`.
///
/// Rules:
/// - `aforo`                      -> `aforo tui`
/// - `aforo -f data.csv ...`      -> `aforo tui -f data.csv ...`
/// - `aforo --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "summary" | "forecast" | "categories" | "tui");
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

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["aforo"])), argv(&["aforo", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["aforo", "-f", "a.csv"])),
            argv(&["aforo", "tui", "-f", "a.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            argv(&["aforo", "summary", "--demo"]),
            argv(&["aforo", "--help"]),
            argv(&["aforo", "categories"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn demo_source_ignores_env() {
        let args = DataArgs {
            file: None,
            demo: true,
            seed: 3,
        };
        let ds = load_data(&args).unwrap();
        assert!(!ds.is_empty());
    }
}
