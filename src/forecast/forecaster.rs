//! Series-level forecasting: split, fit, extrapolate, look up.
//!
//! Every call is independent. The outcome is an explicit enum so callers can
//! tell "nothing to forecast" from "the model could not be fit" from a real
//! forecast; lookups on anything but a fitted forecast resolve to zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{FORECAST_HORIZON, ForecastResult, SarimaParams, TRAIN_FRACTION, TimeSeries, add_months, month_start};
use crate::forecast::fitter::{FitError, FitOptions, fit_sarima};
use crate::forecast::model::SarimaOrder;

/// Forecast settings. Defaults reproduce the dashboard's fixed model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastConfig {
    pub order: SarimaOrder,
    pub train_fraction: f64,
    pub horizon: usize,
    pub fit: FitOptions,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            order: SarimaOrder::default(),
            train_fraction: TRAIN_FRACTION,
            horizon: FORECAST_HORIZON,
            fit: FitOptions::default(),
        }
    }
}

impl ForecastConfig {
    fn validate(&self) -> Result<(), FitError> {
        if !(self.train_fraction.is_finite() && self.train_fraction > 0.0 && self.train_fraction <= 1.0) {
            return Err(FitError::InvalidConfig(format!(
                "train fraction must be in (0, 1] (got {})",
                self.train_fraction
            )));
        }
        if self.horizon == 0 {
            return Err(FitError::InvalidConfig("horizon must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Result of one forecasting attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ForecastOutcome {
    /// Empty or all-zero series: no model was fit.
    Skipped,
    /// The model was fit on the first `train_len` points.
    Fitted {
        train_len: usize,
        params: SarimaParams,
        result: ForecastResult,
    },
    /// Fitting (or extrapolating) failed; degrades to an empty forecast.
    FitFailed {
        train_len: usize,
        #[serde(with = "fit_error_string")]
        error: FitError,
    },
}

impl ForecastOutcome {
    pub fn is_fitted(&self) -> bool {
        matches!(self, ForecastOutcome::Fitted { .. })
    }

    /// Forecast points; empty unless fitted.
    pub fn points(&self) -> &[(NaiveDate, f64)] {
        match self {
            ForecastOutcome::Fitted { result, .. } => &result.points,
            _ => &[],
        }
    }

    /// Forecast value for (`year`, `month`), truncated toward zero.
    ///
    /// Zero when not fitted, when the month is invalid, or when the date lies
    /// outside the forecast horizon.
    pub fn value_for(&self, year: i32, month: u32) -> i64 {
        let ForecastOutcome::Fitted { result, .. } = self else {
            return 0;
        };
        month_start(year, month)
            .and_then(|date| result.value_at(date))
            .map(|v| v.trunc() as i64)
            .unwrap_or(0)
    }
}

/// Number of leading points used for training: `floor(fraction × len)`.
pub fn train_split_len(len: usize, fraction: f64) -> usize {
    ((len as f64) * fraction).floor() as usize
}

/// Fit the configured model on the train split of `series` and extrapolate.
pub fn forecast_series(series: &TimeSeries, config: &ForecastConfig) -> ForecastOutcome {
    if series.is_degenerate() {
        debug!(category = ?series.category, "series empty or all zero; skipping fit");
        return ForecastOutcome::Skipped;
    }

    let train_len = train_split_len(series.len(), config.train_fraction);
    match fit_and_extrapolate(series, train_len, config) {
        Ok((params, result)) => {
            debug!(
                category = ?series.category,
                train_len,
                css = params.css,
                start = ?result.first_date(),
                "forecast fitted"
            );
            ForecastOutcome::Fitted {
                train_len,
                params,
                result,
            }
        }
        Err(error) => {
            warn!(category = ?series.category, train_len, %error, "forecast fit failed; using zero forecast");
            ForecastOutcome::FitFailed { train_len, error }
        }
    }
}

fn fit_and_extrapolate(
    series: &TimeSeries,
    train_len: usize,
    config: &ForecastConfig,
) -> Result<(SarimaParams, ForecastResult), FitError> {
    config.validate()?;

    let values = series.values();
    let train = &values[..train_len.min(values.len())];
    let fit = fit_sarima(&config.order, train, &config.fit)?;
    let predictions = fit.forecast(config.horizon)?;

    // First forecast date: the month right after the training segment.
    let start = match series.points.get(train_len) {
        Some((date, _)) => *date,
        None => series
            .last_date()
            .and_then(|d| add_months(d, 1))
            .ok_or(FitError::NonFiniteForecast)?,
    };

    let mut points = Vec::with_capacity(predictions.len());
    for (h, v) in predictions.into_iter().enumerate() {
        let date = add_months(start, h as u32).ok_or(FitError::NonFiniteForecast)?;
        points.push((date, v));
    }

    Ok((fit.params(), ForecastResult { points }))
}

mod fit_error_string {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::FitError;

    pub fn serialize<S: Serializer>(error: &FitError, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&error.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<FitError, D::Error> {
        let message = String::deserialize(d)?;
        Ok(FitError::InvalidConfig(message))
    }
}
