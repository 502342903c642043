//! Seasonal ARIMA forecasting.
//!
//! - `model`: order bookkeeping, lag expansion, residuals and extrapolation
//! - `grid`: deterministic coefficient grid for the initial search
//! - `fitter`: CSS estimation (grid + Gauss–Newton)
//! - `forecaster`: train split, outcome type and date lookup

pub mod fitter;
pub mod forecaster;
pub mod grid;
pub mod model;

pub use fitter::{FitError, FitOptions, SarimaFit, fit_sarima};
pub use forecaster::{ForecastConfig, ForecastOutcome, forecast_series, train_split_len};
pub use model::SarimaOrder;
