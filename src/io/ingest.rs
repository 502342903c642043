//! CSV ingest.
//!
//! Turns a monthly counts export (one row per year/month, one column per
//! vehicle category) into `RawRecord`s and hands them to the normalizer.
//!
//! - **Strict schema**: year, month and all category columns are required (exit code 2)
//! - **Row-level validation**: rows with an unusable year are skipped and reported
//! - **Encoding**: UTF-8 first, Latin-1 otherwise (the public exports are Latin-1)

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{Category, RawRecord, RowError};
use crate::error::AppError;
use crate::normalize::Dataset;

/// Accepted headers for the year column, after normalization.
const YEAR_HEADERS: [&str; 4] = ["AÑO", "ANO", "ANIO", "YEAR"];
const MONTH_HEADER: &str = "MES";

/// Rows parsed from a CSV body, paired with their 1-based line numbers.
#[derive(Debug, Clone, Default)]
pub struct RawRows {
    pub rows: Vec<(usize, RawRecord)>,
    pub row_errors: Vec<RowError>,
}

/// Read, decode, parse and normalize the CSV at `path`.
///
/// Fails with exit code 2 on I/O or schema problems and with exit code 3 when
/// no row survives normalization.
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let text = decode_text(&bytes);
    let raw = parse_csv(&text)?;
    let dataset = Dataset::from_raw(raw.rows, raw.row_errors);

    info!(
        path = %path.display(),
        rows_read = dataset.rows_read(),
        rows_used = dataset.records().len(),
        rows_dropped = dataset.dropped().len(),
        "dataset loaded"
    );

    if dataset.is_empty() {
        return Err(AppError::new(3, "No valid rows remain after normalization."));
    }
    Ok(dataset)
}

/// Decode `bytes` as UTF-8, falling back to Latin-1 byte-for-byte.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            debug!("input is not valid UTF-8; decoding as Latin-1");
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}

/// Parse CSV text into raw rows, validating the header first.
pub fn parse_csv(text: &str) -> Result<RawRows, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let columns = resolve_columns(&build_header_map(&headers))?;

    let mut out = RawRows::default();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; lines are 1-based.
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                out.row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };
        match parse_row(&record, &columns) {
            Ok(raw) => out.rows.push((line, raw)),
            Err(message) => out.row_errors.push(RowError { line, message }),
        }
    }
    Ok(out)
}

/// Column indices of every required field.
struct Columns {
    year: usize,
    month: usize,
    categories: Vec<(Category, usize)>,
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}

fn resolve_columns(header_map: &HashMap<String, usize>) -> Result<Columns, AppError> {
    let year = YEAR_HEADERS
        .iter()
        .find_map(|h| header_map.get(*h).copied())
        .ok_or_else(|| AppError::new(2, "Missing required column: `AÑO`"))?;
    let month = *header_map
        .get(MONTH_HEADER)
        .ok_or_else(|| AppError::new(2, "Missing required column: `MES`"))?;

    let mut missing = Vec::new();
    let mut categories = Vec::with_capacity(Category::COUNT);
    for category in Category::ALL {
        match header_map.get(category.column_name()) {
            Some(&idx) => categories.push((category, idx)),
            None => missing.push(format!("`{}`", category.column_name())),
        }
    }
    if !missing.is_empty() {
        return Err(AppError::new(
            2,
            format!("Missing required column(s): {}", missing.join(", ")),
        ));
    }

    Ok(Columns {
        year,
        month,
        categories,
    })
}

fn parse_row(record: &StringRecord, columns: &Columns) -> Result<RawRecord, String> {
    let year_raw = record.get(columns.year).unwrap_or("").trim();
    let year = parse_year(year_raw).ok_or_else(|| format!("Invalid year '{year_raw}'."))?;
    let month_name = record.get(columns.month).unwrap_or("").trim().to_string();

    let category_counts: BTreeMap<Category, String> = columns
        .categories
        .iter()
        .map(|&(c, idx)| (c, record.get(idx).unwrap_or("").to_string()))
        .collect();

    Ok(RawRecord {
        year,
        month_name,
        category_counts,
    })
}

/// Years occasionally come through spreadsheets as `2021.0`.
fn parse_year(s: &str) -> Option<i32> {
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < f64::from(i32::MAX) {
        Some(f as i32)
    } else {
        None
    }
}
