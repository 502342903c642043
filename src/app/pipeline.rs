//! Shared dashboard pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! dataset -> monthly series -> forecast -> totals/lookup -> month table
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::debug;

use crate::aggregate::monthly_series;
use crate::domain::{MonthTable, QueryParams, TimeSeries};
use crate::forecast::{ForecastConfig, ForecastOutcome, forecast_series};
use crate::normalize::Dataset;
use crate::query;

/// Everything the dashboard shows for one set of query parameters.
#[derive(Debug, Clone)]
pub struct Summary {
    pub total: f64,
    pub forecast_value: i64,
    pub table: MonthTable,
    pub series: TimeSeries,
    pub forecast: ForecastOutcome,
}

/// Compute a [`Summary`] from scratch.
pub fn compute_summary(dataset: &Dataset, params: &QueryParams, config: &ForecastConfig) -> Summary {
    let series = monthly_series(dataset, params.category);
    let forecast = forecast_series(&series, config);
    Summary {
        total: query::total(dataset, params.category, params.year_from, params.year_to),
        forecast_value: forecast.value_for(params.year, params.month),
        table: query::month_table(dataset, &params.selected, params.year, params.month),
        series,
        forecast,
    }
}

/// Demand-driven recomputation over an immutable dataset.
///
/// Holds the last computed summary keyed by its params; asking again with an
/// equal `QueryParams` value is free.
#[derive(Debug)]
pub struct Session<'a> {
    dataset: &'a Dataset,
    config: ForecastConfig,
    cache: Option<(QueryParams, Summary)>,
    recomputations: usize,
}

impl<'a> Session<'a> {
    pub fn new(dataset: &'a Dataset, config: ForecastConfig) -> Self {
        Self {
            dataset,
            config,
            cache: None,
            recomputations: 0,
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Number of times a summary was actually computed.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    /// Summary for `params`, recomputed only when they differ from the cached ones.
    pub fn summary(&mut self, params: &QueryParams) -> &Summary {
        let entry = match self.cache.take() {
            Some((cached, summary)) if cached == *params => (cached, summary),
            _ => {
                debug!(?params, "recomputing summary");
                self.recomputations += 1;
                (params.clone(), compute_summary(self.dataset, params, &self.config))
            }
        };
        &self.cache.insert(entry).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::{SyntheticConfig, demo_dataset};
    use crate::domain::Category;

    fn dataset() -> Dataset {
        demo_dataset(&SyntheticConfig::default()).unwrap()
    }

    #[test]
    fn identical_params_hit_the_cache() {
        let ds = dataset();
        let mut session = Session::new(&ds, ForecastConfig::default());
        let params = QueryParams::default();

        let first = session.summary(&params).total;
        let second = session.summary(&params.clone()).total;
        assert_eq!(first, second);
        assert_eq!(session.recomputations(), 1);
    }

    #[test]
    fn each_change_recomputes_once() {
        let ds = dataset();
        let mut session = Session::new(&ds, ForecastConfig::default());
        let mut params = QueryParams::default();
        session.summary(&params);

        params.month = 7;
        session.summary(&params);
        session.summary(&params);
        assert_eq!(session.recomputations(), 2);

        params.selected = vec![Category::Motos];
        session.summary(&params);
        assert_eq!(session.recomputations(), 3);

        // Going back to an older value is still a change relative to the cache.
        params.month = 6;
        session.summary(&params);
        assert_eq!(session.recomputations(), 4);
    }

    #[test]
    fn summary_matches_individual_queries() {
        let ds = dataset();
        let params = QueryParams {
            category: Category::Camion5,
            year_from: 2021,
            year_to: 2024,
            year: 2025,
            month: 3,
            selected: vec![Category::Autos, Category::Camion5],
        };
        let cfg = ForecastConfig::default();
        let s = compute_summary(&ds, &params, &cfg);
        assert_eq!(s.total, query::total(&ds, Category::Camion5, 2021, 2024));
        assert_eq!(s.forecast_value, query::forecast_value(&ds, Category::Camion5, 2025, 3, &cfg));
        assert!(s.forecast.is_fitted());
        assert!(s.forecast_value > 0);
        assert_eq!(s.table.columns, params.selected);
        assert!(s.table.rows.is_empty());
    }

    #[test]
    fn uncounted_category_has_zero_forecast() {
        let ds = dataset();
        let params = QueryParams {
            category: Category::Peatones,
            ..QueryParams::default()
        };
        let s = compute_summary(&ds, &params, &ForecastConfig::default());
        assert_eq!(s.total, 0.0);
        assert_eq!(s.forecast, ForecastOutcome::Skipped);
        assert_eq!(s.forecast_value, 0);
    }
}
