//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during normalization, aggregation and forecasting
//! - rendered by the CLI/TUI front-ends
//! - emitted as JSON (`aforo forecast --json`)

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// First year from which aggregated series are considered valid.
pub const EPOCH_YEAR: i32 = 2021;

/// Number of monthly periods produced by a successful forecast.
pub const FORECAST_HORIZON: usize = 36;

/// Fraction of the series used to fit the model (the rest is holdout).
pub const TRAIN_FRACTION: f64 = 0.8;

/// Seasonal period (months per year).
pub const SEASONAL_PERIOD: usize = 12;

/// Vehicle categories counted at the toll plazas.
///
/// The set is closed: the source dataset has exactly one column per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Autos,
    Motos,
    #[value(name = "autobus-2")]
    #[serde(rename = "autobus-2")]
    Autobus2,
    #[value(name = "autobus-3")]
    #[serde(rename = "autobus-3")]
    Autobus3,
    #[value(name = "autobus-4")]
    #[serde(rename = "autobus-4")]
    Autobus4,
    #[value(name = "camion-2")]
    #[serde(rename = "camion-2")]
    Camion2,
    #[value(name = "camion-3")]
    #[serde(rename = "camion-3")]
    Camion3,
    #[value(name = "camion-4")]
    #[serde(rename = "camion-4")]
    Camion4,
    #[value(name = "camion-5")]
    #[serde(rename = "camion-5")]
    Camion5,
    #[value(name = "camion-6")]
    #[serde(rename = "camion-6")]
    Camion6,
    #[value(name = "camion-7")]
    #[serde(rename = "camion-7")]
    Camion7,
    #[value(name = "camion-8")]
    #[serde(rename = "camion-8")]
    Camion8,
    #[value(name = "camion-9")]
    #[serde(rename = "camion-9")]
    Camion9,
    Triciclos,
    EjeExtraAutobus,
    EjeExtraCamion,
    Peatones,
}

/// Icon used when a category has no entry in [`CATEGORY_ICONS`].
pub const DEFAULT_ICON: &str = "car";

/// Icon keys per category, consumed by the presentation layer.
pub const CATEGORY_ICONS: &[(Category, &str)] = &[
    (Category::Autos, "car"),
    (Category::Motos, "motorcycle"),
    (Category::Autobus2, "bus"),
    (Category::Autobus3, "bus"),
    (Category::Autobus4, "bus"),
    (Category::Camion2, "truck"),
    (Category::Camion3, "truck"),
    (Category::Camion4, "truck"),
    (Category::Camion5, "truck"),
    (Category::Camion6, "truck"),
    (Category::Camion7, "truck"),
    (Category::Camion8, "truck"),
    (Category::Camion9, "truck"),
    (Category::Triciclos, "bicycle"),
    (Category::EjeExtraAutobus, "plus"),
    (Category::EjeExtraCamion, "plus"),
    (Category::Peatones, "person-walking"),
];

impl Category {
    pub const COUNT: usize = 17;

    /// All categories in source column order.
    pub const ALL: [Category; Category::COUNT] = [
        Category::Autos,
        Category::Motos,
        Category::Autobus2,
        Category::Autobus3,
        Category::Autobus4,
        Category::Camion2,
        Category::Camion3,
        Category::Camion4,
        Category::Camion5,
        Category::Camion6,
        Category::Camion7,
        Category::Camion8,
        Category::Camion9,
        Category::Triciclos,
        Category::EjeExtraAutobus,
        Category::EjeExtraCamion,
        Category::Peatones,
    ];

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Header of the source column holding this category.
    pub fn column_name(self) -> &'static str {
        match self {
            Category::Autos => "AUTOS",
            Category::Motos => "MOTOS",
            Category::Autobus2 => "AUTOBUS DE 2 EJES",
            Category::Autobus3 => "AUTOBUS DE 3 EJES",
            Category::Autobus4 => "AUTOBUS DE 4 EJES",
            Category::Camion2 => "CAMIONES DE 2 EJES",
            Category::Camion3 => "CAMIONES DE 3 EJES",
            Category::Camion4 => "CAMIONES DE 4 EJES",
            Category::Camion5 => "CAMIONES DE 5 EJES",
            Category::Camion6 => "CAMIONES DE 6 EJES",
            Category::Camion7 => "CAMIONES DE 7 EJES",
            Category::Camion8 => "CAMIONES DE 8 EJES",
            Category::Camion9 => "CAMIONES DE 9 EJES",
            Category::Triciclos => "TRICICLOS",
            Category::EjeExtraAutobus => "EJE EXTRA AUTOBUS",
            Category::EjeExtraCamion => "EJE EXTRA CAMION",
            Category::Peatones => "PEATONES",
        }
    }

    /// Human-readable label for terminal output ("Autobus De 2 Ejes").
    pub fn display_name(self) -> String {
        self.column_name()
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Icon key from the static lookup table.
    pub fn icon(self) -> &'static str {
        CATEGORY_ICONS
            .iter()
            .find(|(c, _)| *c == self)
            .map(|(_, icon)| *icon)
            .unwrap_or(DEFAULT_ICON)
    }

    pub fn next(self) -> Self {
        Category::ALL[(self.index() + 1) % Category::COUNT]
    }

    pub fn prev(self) -> Self {
        Category::ALL[(self.index() + Category::COUNT - 1) % Category::COUNT]
    }
}

/// Per-category values stored densely, indexed by [`Category::index`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryCounts([Option<f64>; Category::COUNT]);

impl CategoryCounts {
    pub fn get(&self, category: Category) -> Option<f64> {
        self.0[category.index()]
    }

    pub fn set(&mut self, category: Category, value: Option<f64>) {
        self.0[category.index()] = value;
    }

    /// Value with nulls treated as zero (the aggregation convention).
    pub fn get_or_zero(&self, category: Category) -> f64 {
        self.get(category).unwrap_or(0.0)
    }
}

/// A raw row as it appears in the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub year: i32,
    pub month_name: String,
    pub category_counts: BTreeMap<Category, String>,
}

/// A validated monthly observation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub year: i32,
    /// 1..=12.
    pub month_number: u32,
    /// Always the first day of (`year`, `month_number`).
    pub date: NaiveDate,
    /// Month name as it appeared in the source (upper-cased).
    pub month_name: String,
    pub category_counts: CategoryCounts,
}

/// A row dropped during ingest or normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Regular monthly series for one category.
///
/// Dates are month starts, strictly increasing, with no gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub category: Category,
    pub points: Vec<(NaiveDate, f64)>,
}

impl TimeSeries {
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.points.iter().map(|(_, v)| v).sum()
    }

    /// Empty for forecasting purposes: no points or an exactly-zero total.
    pub fn is_degenerate(&self) -> bool {
        self.is_empty() || self.sum() == 0.0
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|(d, _)| *d).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(d, _)| *d)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(d, _)| *d)
    }
}

/// Point forecasts over a contiguous monthly horizon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastResult {
    pub points: Vec<(NaiveDate, f64)>,
}

impl ForecastResult {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(d, _)| *d)
    }

    /// Predicted value at `date`, if it falls inside the horizon.
    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.points.iter().find(|(d, _)| *d == date).map(|(_, v)| *v)
    }
}

/// Fitted SARIMA coefficients (sign convention: `(1 - φB)(1 - ΦB^s) w = (1 + θB)(1 + ΘB^s) e`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarimaParams {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
    /// Conditional sum of squared residuals at the estimate.
    pub css: f64,
    /// Number of residuals the objective was computed over.
    pub n_resid: usize,
}

/// Inferred spacing of a date sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Monthly,
    Quarterly,
    Annual,
    Indeterminate,
}

/// Cadence query answer; `NoData` when the restricted series is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CadenceLabel {
    NoData,
    Inferred(Cadence),
}

impl CadenceLabel {
    pub fn display_name(self) -> &'static str {
        match self {
            CadenceLabel::NoData => "no data",
            CadenceLabel::Inferred(Cadence::Monthly) => "monthly",
            CadenceLabel::Inferred(Cadence::Quarterly) => "quarterly",
            CadenceLabel::Inferred(Cadence::Annual) => "annual",
            CadenceLabel::Inferred(Cadence::Indeterminate) => "indeterminate",
        }
    }
}

/// Largest/smallest mover among a selection of categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Extremes {
    InsufficientData,
    Found {
        max: (Category, f64),
        min: (Category, f64),
    },
}

/// Records of one (year, month) projected onto the selected categories.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthTable {
    pub columns: Vec<Category>,
    pub rows: Vec<MonthTableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTableRow {
    pub year: i32,
    pub month_name: String,
    pub date: NaiveDate,
    /// Aligned with [`MonthTable::columns`].
    pub values: Vec<Option<f64>>,
}

/// Per-year sums for one category (grouped bar chart input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyTotals {
    pub category: Category,
    pub totals: Vec<(i32, f64)>,
}

/// The inputs of one dashboard recomputation.
///
/// Compared by value: any difference invalidates the memoized summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub category: Category,
    pub year_from: i32,
    pub year_to: i32,
    pub year: i32,
    pub month: u32,
    pub selected: Vec<Category>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            category: Category::Autos,
            year_from: EPOCH_YEAR,
            year_to: 2025,
            year: 2025,
            month: 6,
            selected: Vec::new(),
        }
    }
}

/// First day of (`year`, `month`), or `None` for an invalid month.
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// `date` shifted forward by `months` calendar months.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Whole months from `a` to `b` (ignores the day of month).
pub fn months_between(a: NaiveDate, b: NaiveDate) -> i32 {
    (b.year() - a.year()) * 12 + (b.month() as i32 - a.month() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_indexed_in_column_order() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
        assert_eq!(Category::Peatones.next(), Category::Autos);
        assert_eq!(Category::Autos.prev(), Category::Peatones);
    }

    #[test]
    fn display_name_is_title_case() {
        assert_eq!(Category::Autobus2.display_name(), "Autobus De 2 Ejes");
        assert_eq!(Category::Autos.display_name(), "Autos");
    }

    #[test]
    fn every_category_has_an_icon() {
        assert_eq!(Category::Peatones.icon(), "person-walking");
        assert_eq!(Category::Camion7.icon(), "truck");
        assert_eq!(CATEGORY_ICONS.len(), Category::COUNT);
    }

    #[test]
    fn month_arithmetic() {
        let d = month_start(2021, 11).unwrap();
        assert_eq!(add_months(d, 3), month_start(2022, 2));
        assert_eq!(months_between(d, month_start(2022, 2).unwrap()), 3);
        assert!(month_start(2021, 13).is_none());
    }
}
