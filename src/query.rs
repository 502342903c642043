//! Dashboard queries over an immutable [`Dataset`].
//!
//! Every function here is pure: same dataset and arguments, same answer.

use chrono::NaiveDate;

use crate::aggregate::{monthly_series, summed_in_years};
use crate::domain::{
    Cadence, CadenceLabel, Category, Extremes, MonthTable, MonthTableRow, NormalizedRecord, YearlyTotals,
    months_between,
};
use crate::forecast::{ForecastConfig, forecast_series};
use crate::normalize::Dataset;

fn in_years(r: &NormalizedRecord, year_from: i32, year_to: i32) -> bool {
    r.year >= year_from && r.year <= year_to
}

/// Sum of raw `category` values for years in `[year_from, year_to]`.
///
/// Nulls are skipped; an empty or inverted range yields `0.0`.
pub fn total(dataset: &Dataset, category: Category, year_from: i32, year_to: i32) -> f64 {
    dataset
        .records()
        .iter()
        .filter(|r| in_years(r, year_from, year_to))
        .filter_map(|r| r.category_counts.get(category))
        .sum()
}

/// Forecast for (`year`, `month`), truncated to an integer; `0` on any miss.
pub fn forecast_value(dataset: &Dataset, category: Category, year: i32, month: u32, config: &ForecastConfig) -> i64 {
    forecast_series(&monthly_series(dataset, category), config).value_for(year, month)
}

/// Uniform spacing of `dates`, in the vocabulary of [`Cadence`].
///
/// Fewer than three dates are never enough to call a frequency.
pub fn infer_cadence(dates: &[NaiveDate]) -> Cadence {
    if dates.len() < 3 {
        return Cadence::Indeterminate;
    }
    let step = months_between(dates[0], dates[1]);
    let uniform = dates.windows(2).all(|w| months_between(w[0], w[1]) == step);
    match (uniform, step) {
        (true, 1) => Cadence::Monthly,
        (true, 3) => Cadence::Quarterly,
        (true, 12) => Cadence::Annual,
        _ => Cadence::Indeterminate,
    }
}

/// Cadence of the summed (non-resampled) series restricted to the year range.
pub fn cadence_label(dataset: &Dataset, category: Category, year_from: i32, year_to: i32) -> CadenceLabel {
    let summed = summed_in_years(dataset, category, year_from, year_to);
    if summed.is_empty() {
        return CadenceLabel::NoData;
    }
    let dates: Vec<NaiveDate> = summed.iter().map(|(d, _)| *d).collect();
    CadenceLabel::Inferred(infer_cadence(&dates))
}

/// Per-category sums for `year`, in selection order. Nulls count as zero.
pub fn category_breakdown(dataset: &Dataset, selected: &[Category], year: i32) -> Vec<(Category, f64)> {
    selected
        .iter()
        .map(|&c| {
            let sum = dataset
                .records()
                .iter()
                .filter(|r| r.year == year)
                .map(|r| r.category_counts.get_or_zero(c))
                .sum();
            (c, sum)
        })
        .collect()
}

/// Categories with the largest and smallest sums in `year`.
///
/// Nulls count as zero, so a category with no values that year can be the
/// minimum. `InsufficientData` when nothing is selected, the year has no
/// records, or every selected value that year is null. Ties go to the earlier
/// category in `selected`.
pub fn extremes(dataset: &Dataset, selected: &[Category], year: i32) -> Extremes {
    let year_records: Vec<&NormalizedRecord> = dataset.records().iter().filter(|r| r.year == year).collect();
    let any_value = year_records
        .iter()
        .any(|r| selected.iter().any(|&c| r.category_counts.get(c).is_some()));
    if !any_value {
        return Extremes::InsufficientData;
    }

    let mut max: Option<(Category, f64)> = None;
    let mut min: Option<(Category, f64)> = None;
    for &c in selected {
        let sum: f64 = year_records.iter().map(|r| r.category_counts.get_or_zero(c)).sum();
        if max.is_none_or(|(_, m)| sum > m) {
            max = Some((c, sum));
        }
        if min.is_none_or(|(_, m)| sum < m) {
            min = Some((c, sum));
        }
    }

    match (max, min) {
        (Some(max), Some(min)) => Extremes::Found { max, min },
        _ => Extremes::InsufficientData,
    }
}

/// Records of (`year`, `month`) projected onto the selected categories.
pub fn month_table(dataset: &Dataset, selected: &[Category], year: i32, month: u32) -> MonthTable {
    let mut matching: Vec<&NormalizedRecord> = dataset
        .records()
        .iter()
        .filter(|r| r.year == year && r.month_number == month)
        .collect();
    matching.sort_by_key(|r| r.date);

    MonthTable {
        columns: selected.to_vec(),
        rows: matching
            .into_iter()
            .map(|r| MonthTableRow {
                year: r.year,
                month_name: r.month_name.clone(),
                date: r.date,
                values: selected.iter().map(|&c| r.category_counts.get(c)).collect(),
            })
            .collect(),
    }
}

/// Per-year sums for each selected category over `[year_from, year_to]`.
///
/// Only years that have at least one record appear. Empty when the selection
/// or the filtered records are empty.
pub fn yearly_breakdown(dataset: &Dataset, selected: &[Category], year_from: i32, year_to: i32) -> Vec<YearlyTotals> {
    let mut years: Vec<i32> = dataset
        .records()
        .iter()
        .filter(|r| in_years(r, year_from, year_to))
        .map(|r| r.year)
        .collect();
    years.sort_unstable();
    years.dedup();
    if years.is_empty() {
        return Vec::new();
    }

    selected
        .iter()
        .map(|&c| YearlyTotals {
            category: c,
            totals: years
                .iter()
                .map(|&y| {
                    let sum = dataset
                        .records()
                        .iter()
                        .filter(|r| r.year == y)
                        .map(|r| r.category_counts.get_or_zero(c))
                        .sum();
                    (y, sum)
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryCounts, month_start};

    fn rec(year: i32, month: u32, values: &[(Category, Option<f64>)]) -> NormalizedRecord {
        let mut counts = CategoryCounts::default();
        for &(c, v) in values {
            counts.set(c, v);
        }
        NormalizedRecord {
            year,
            month_number: month,
            date: month_start(year, month).unwrap(),
            month_name: crate::normalize::MONTH_NAMES[month as usize - 1].to_string(),
            category_counts: counts,
        }
    }

    fn monthly_autos(years: std::ops::RangeInclusive<i32>) -> Dataset {
        let mut records = Vec::new();
        for y in years {
            for m in 1..=12 {
                records.push(rec(y, m, &[(Category::Autos, Some(f64::from(y - 2000) * 100.0 + f64::from(m)))]));
            }
        }
        Dataset::from_records(records)
    }

    #[test]
    fn total_is_additive_over_disjoint_ranges() {
        let ds = monthly_autos(2019..=2025);
        let whole = total(&ds, Category::Autos, 2021, 2025);
        let split = total(&ds, Category::Autos, 2021, 2022) + total(&ds, Category::Autos, 2023, 2025);
        assert_eq!(whole, split);
        assert_eq!(total(&ds, Category::Autos, 2030, 2031), 0.0);
        assert_eq!(total(&ds, Category::Autos, 2025, 2021), 0.0);
    }

    #[test]
    fn total_skips_nulls() {
        let ds = Dataset::from_records(vec![
            rec(2022, 1, &[(Category::Motos, Some(5.0))]),
            rec(2022, 2, &[(Category::Motos, None)]),
            rec(2022, 3, &[(Category::Motos, Some(7.0))]),
        ]);
        assert_eq!(total(&ds, Category::Motos, 2022, 2022), 12.0);
    }

    #[test]
    fn cadence_labels() {
        let ds = monthly_autos(2021..=2022);
        assert_eq!(
            cadence_label(&ds, Category::Autos, 2021, 2022),
            CadenceLabel::Inferred(Cadence::Monthly)
        );
        assert_eq!(cadence_label(&ds, Category::Autos, 1990, 1995), CadenceLabel::NoData);

        let quarterly = Dataset::from_records(
            [1, 4, 7, 10]
                .into_iter()
                .map(|m| rec(2023, m, &[(Category::Autos, Some(1.0))]))
                .collect(),
        );
        assert_eq!(
            cadence_label(&quarterly, Category::Autos, 2023, 2023),
            CadenceLabel::Inferred(Cadence::Quarterly)
        );

        let annual = Dataset::from_records(
            (2021..=2024)
                .map(|y| rec(y, 6, &[(Category::Autos, Some(1.0))]))
                .collect(),
        );
        assert_eq!(
            cadence_label(&annual, Category::Autos, 2021, 2024),
            CadenceLabel::Inferred(Cadence::Annual)
        );
    }

    #[test]
    fn irregular_or_short_dates_are_indeterminate() {
        let d = |y, m| month_start(y, m).unwrap();
        assert_eq!(infer_cadence(&[d(2021, 1), d(2021, 2)]), Cadence::Indeterminate);
        assert_eq!(
            infer_cadence(&[d(2021, 1), d(2021, 2), d(2021, 4)]),
            Cadence::Indeterminate
        );
        assert_eq!(
            infer_cadence(&[d(2021, 1), d(2021, 3), d(2021, 5)]),
            Cadence::Indeterminate
        );
    }

    #[test]
    fn breakdown_follows_selection_order() {
        let ds = Dataset::from_records(vec![
            rec(2024, 1, &[(Category::Autos, Some(10.0)), (Category::Motos, Some(3.0))]),
            rec(2024, 2, &[(Category::Autos, Some(5.0)), (Category::Motos, None)]),
            rec(2023, 2, &[(Category::Autos, Some(99.0))]),
        ]);
        let out = category_breakdown(&ds, &[Category::Motos, Category::Autos, Category::Peatones], 2024);
        assert_eq!(
            out,
            vec![(Category::Motos, 3.0), (Category::Autos, 15.0), (Category::Peatones, 0.0)]
        );
    }

    #[test]
    fn single_category_is_both_extremes() {
        let ds = monthly_autos(2021..=2021);
        let Extremes::Found { max, min } = extremes(&ds, &[Category::Autos], 2021) else {
            panic!("expected extremes");
        };
        assert_eq!(max.0, Category::Autos);
        assert_eq!(min, max);
    }

    #[test]
    fn extremes_need_data() {
        let ds = Dataset::from_records(vec![rec(2024, 1, &[(Category::Autos, Some(10.0))])]);
        assert_eq!(extremes(&ds, &[], 2024), Extremes::InsufficientData);
        assert_eq!(extremes(&ds, &[Category::Motos], 2024), Extremes::InsufficientData);
        assert_eq!(extremes(&ds, &[Category::Autos], 2019), Extremes::InsufficientData);
    }

    #[test]
    fn all_null_category_is_the_minimum_at_zero() {
        let ds = Dataset::from_records(vec![rec(
            2024,
            1,
            &[(Category::Autos, Some(10.0)), (Category::Peatones, None)],
        )]);
        let selected = [Category::Autos, Category::Peatones];
        assert_eq!(
            extremes(&ds, &selected, 2024),
            Extremes::Found {
                max: (Category::Autos, 10.0),
                min: (Category::Peatones, 0.0)
            }
        );
        assert_eq!(
            category_breakdown(&ds, &selected, 2024),
            vec![(Category::Autos, 10.0), (Category::Peatones, 0.0)]
        );
    }

    #[test]
    fn extremes_ties_go_to_first_selected() {
        let ds = Dataset::from_records(vec![rec(
            2024,
            1,
            &[
                (Category::Autos, Some(10.0)),
                (Category::Motos, Some(10.0)),
                (Category::Peatones, Some(2.0)),
            ],
        )]);
        let got = extremes(&ds, &[Category::Motos, Category::Autos, Category::Peatones], 2024);
        assert_eq!(
            got,
            Extremes::Found {
                max: (Category::Motos, 10.0),
                min: (Category::Peatones, 2.0)
            }
        );
    }

    #[test]
    fn month_table_projects_selected_columns() {
        let ds = Dataset::from_records(vec![
            rec(2024, 3, &[(Category::Autos, Some(1.0)), (Category::Motos, None)]),
            rec(2024, 4, &[(Category::Autos, Some(2.0))]),
            rec(2024, 3, &[(Category::Autos, Some(3.0)), (Category::Motos, Some(4.0))]),
        ]);
        let table = month_table(&ds, &[Category::Motos, Category::Autos], 2024, 3);
        assert_eq!(table.columns, vec![Category::Motos, Category::Autos]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].month_name, "MARZO");
        assert_eq!(table.rows[0].values, vec![None, Some(1.0)]);
        assert_eq!(table.rows[1].values, vec![Some(4.0), Some(3.0)]);
        assert!(month_table(&ds, &[Category::Autos], 2024, 5).rows.is_empty());
    }

    #[test]
    fn yearly_breakdown_lists_observed_years() {
        let ds = monthly_autos(2020..=2022);
        let out = yearly_breakdown(&ds, &[Category::Autos, Category::Motos], 2021, 2030);
        assert_eq!(out.len(), 2);
        let years: Vec<i32> = out[0].totals.iter().map(|(y, _)| *y).collect();
        assert_eq!(years, vec![2021, 2022]);
        assert_eq!(out[0].totals[0].1, total(&ds, Category::Autos, 2021, 2021));
        assert!(out[1].totals.iter().all(|(_, v)| *v == 0.0));
        assert!(yearly_breakdown(&ds, &[], 2021, 2022).is_empty());
        assert!(yearly_breakdown(&ds, &[Category::Autos], 1990, 1991).is_empty());
    }

    #[test]
    fn forecast_value_of_empty_category_is_zero() {
        let ds = monthly_autos(2021..=2024);
        assert_eq!(forecast_value(&ds, Category::Peatones, 2025, 6, &ForecastConfig::default()), 0);
    }
}
