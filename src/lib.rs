//! `aforo-forecast` library crate.
//!
//! The binary (`aforo`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the aggregation and forecasting pipeline is reusable outside the CLI/TUI
//!
//! Core flow: `io::ingest` / `data::synthetic` → `normalize` → `aggregate`
//! → `forecast` → `query` → `app::pipeline::Session`.

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod math;
pub mod normalize;
pub mod plot;
pub mod query;
pub mod report;
pub mod tui;
