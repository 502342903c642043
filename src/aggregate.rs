//! Per-category monthly aggregation.
//!
//! Pipeline for one category:
//!
//! 1. sum values of all records sharing a date (nulls count as zero)
//! 2. walk every month from the first summed date to the last one; a month
//!    missing from the data takes the previous month's value
//! 3. keep only months on or after [`EPOCH_YEAR`]

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{Category, EPOCH_YEAR, NormalizedRecord, TimeSeries, add_months};
use crate::normalize::Dataset;

/// Sum `category` per date over records accepted by `keep`.
fn sum_by_date<F>(records: &[NormalizedRecord], category: Category, keep: F) -> BTreeMap<NaiveDate, f64>
where
    F: Fn(&NormalizedRecord) -> bool,
{
    let mut sums = BTreeMap::new();
    for r in records.iter().filter(|r| keep(r)) {
        *sums.entry(r.date).or_insert(0.0) += r.category_counts.get_or_zero(category);
    }
    sums
}

/// Summed, non-resampled series for records whose year is in `[year_from, year_to]`.
///
/// Dates are sorted and unique; months without records are simply absent.
pub fn summed_in_years(
    dataset: &Dataset,
    category: Category,
    year_from: i32,
    year_to: i32,
) -> Vec<(NaiveDate, f64)> {
    sum_by_date(dataset.records(), category, |r| {
        r.year >= year_from && r.year <= year_to
    })
    .into_iter()
    .collect()
}

/// Regular monthly series for `category`, forward-filled and epoch-truncated.
pub fn monthly_series(dataset: &Dataset, category: Category) -> TimeSeries {
    let sums = sum_by_date(dataset.records(), category, |_| true);
    let (Some((&first, _)), Some((&last, _))) = (sums.first_key_value(), sums.last_key_value()) else {
        return TimeSeries::empty(category);
    };

    let mut points = Vec::new();
    let mut carried = 0.0;
    let mut date = first;
    let mut step = 0u32;
    while date <= last {
        if let Some(&v) = sums.get(&date) {
            carried = v;
        }
        if date.year() >= EPOCH_YEAR {
            points.push((date, carried));
        }
        step += 1;
        date = match add_months(first, step) {
            Some(d) => d,
            None => break,
        };
    }

    TimeSeries { category, points }
}
