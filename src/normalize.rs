//! Raw row normalization.
//!
//! Turns textual monthly counts into `NormalizedRecord`s:
//!
//! - counts: thousands separators and surrounding whitespace are stripped, then
//!   the value is coerced to a number; anything unusable becomes `None`
//! - months: Spanish month names, matched case-insensitively
//! - dates: always the first day of the month
//!
//! Only an unknown month name (or a year no calendar date can hold) rejects a
//! row. Numeric problems never do.

use thiserror::Error;
use tracing::debug;

use crate::domain::{Category, CategoryCounts, NormalizedRecord, RawRecord, RowError, month_start};

/// Month vocabulary of the source data, in calendar order.
pub const MONTH_NAMES: [&str; 12] = [
    "ENERO",
    "FEBRERO",
    "MARZO",
    "ABRIL",
    "MAYO",
    "JUNIO",
    "JULIO",
    "AGOSTO",
    "SEPTIEMBRE",
    "OCTUBRE",
    "NOVIEMBRE",
    "DICIEMBRE",
];

/// Why a raw row could not become a `NormalizedRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("Unknown month name '{0}'.")]
    UnknownMonth(String),
    #[error("Year {0} is out of the supported date range.")]
    YearOutOfRange(i32),
}

/// Immutable store of normalized records plus ingest diagnostics.
///
/// Built once at startup and shared by reference with every query.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<NormalizedRecord>,
    dropped: Vec<RowError>,
    rows_read: usize,
}

impl Dataset {
    /// Normalize `rows` (paired with their source line numbers) into a dataset.
    ///
    /// `ingest_errors` are rows that never made it to a `RawRecord` (e.g. an
    /// unparseable year); they are kept for reporting.
    pub fn from_raw(rows: Vec<(usize, RawRecord)>, ingest_errors: Vec<RowError>) -> Self {
        let rows_read = rows.len() + ingest_errors.len();
        let mut dropped = ingest_errors;
        let mut records = Vec::with_capacity(rows.len());

        for (line, raw) in rows {
            match normalize_record(&raw) {
                Ok(record) => records.push(record),
                Err(e) => {
                    debug!(line, error = %e, "dropping row");
                    dropped.push(RowError {
                        line,
                        message: e.to_string(),
                    });
                }
            }
        }

        dropped.sort_by_key(|e| e.line);
        Self {
            records,
            dropped,
            rows_read,
        }
    }

    /// Build a dataset from already-normalized records (tests, synthetic data).
    pub fn from_records(records: Vec<NormalizedRecord>) -> Self {
        let rows_read = records.len();
        Self {
            records,
            dropped: Vec::new(),
            rows_read,
        }
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn dropped(&self) -> &[RowError] {
        &self.dropped
    }

    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inclusive (min, max) year present in the records.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }
}

/// Normalize one raw row.
pub fn normalize_record(raw: &RawRecord) -> Result<NormalizedRecord, NormalizeError> {
    let month_number =
        month_number(&raw.month_name).ok_or_else(|| NormalizeError::UnknownMonth(raw.month_name.trim().to_string()))?;
    let date = month_start(raw.year, month_number).ok_or(NormalizeError::YearOutOfRange(raw.year))?;

    let mut counts = CategoryCounts::default();
    for category in Category::ALL {
        let value = raw
            .category_counts
            .get(&category)
            .and_then(|s| parse_count(s));
        counts.set(category, value);
    }

    Ok(NormalizedRecord {
        year: raw.year,
        month_number,
        date,
        month_name: raw.month_name.trim().to_uppercase(),
        category_counts: counts,
    })
}

/// Map a month name to its 1-based ordinal (case-insensitive).
pub fn month_number(name: &str) -> Option<u32> {
    let upper = name.trim().to_uppercase();
    MONTH_NAMES
        .iter()
        .position(|m| *m == upper)
        .map(|idx| idx as u32 + 1)
}

/// Coerce a raw count cell to a non-negative number.
///
/// `"1,234 "` → `Some(1234.0)`; blanks, junk, `NaN`/`inf` and negatives → `None`.
pub fn parse_count(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    let v = cleaned.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 { Some(v) } else { None }
}
