//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the closed vehicle `Category` set and its icon table
//! - raw and normalized monthly records (`RawRecord`, `NormalizedRecord`)
//! - series and forecast outputs (`TimeSeries`, `ForecastResult`, etc.)
//! - query parameters and answers (`QueryParams`, `CadenceLabel`, `Extremes`)

pub mod types;

pub use types::*;
