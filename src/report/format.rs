//! Formatted terminal output for the dashboard queries.
//!
//! We keep formatting code in one place so:
//! - the aggregation/forecasting code stays clean and testable
//! - output changes are localized

use chrono::NaiveDate;

use crate::app::pipeline::Summary;
use crate::domain::{CadenceLabel, Category, Extremes, MonthTable, QueryParams, YearlyTotals};
use crate::forecast::{ForecastConfig, ForecastOutcome};
use crate::normalize::Dataset;

/// `1234567.8` → `"1,234,568"`. Non-finite values render as `"-"`.
pub fn format_count(v: f64) -> String {
    if !v.is_finite() {
        return "-".to_string();
    }
    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Integer variant of [`format_count`] for forecast lookups.
pub fn format_int(v: i64) -> String {
    format_count(v as f64)
}

/// The header block printed by `aforo summary`.
pub fn format_summary(
    dataset: &Dataset,
    params: &QueryParams,
    summary: &Summary,
    cadence: CadenceLabel,
    config: &ForecastConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== aforo - Monthly toll counts ===\n");
    out.push_str(&format!(
        "Rows: read={} used={} dropped={}\n",
        dataset.rows_read(),
        dataset.records().len(),
        dataset.dropped().len()
    ));
    out.push_str(&format!(
        "Vehicle: {} [{}]\n",
        params.category.display_name(),
        params.category.icon()
    ));
    out.push_str(&format!(
        "Total {}-{}: {}\n",
        params.year_from,
        params.year_to,
        format_count(summary.total)
    ));
    out.push_str(&format!("Frequency: {}\n", cadence.display_name()));
    out.push_str(&format!(
        "Forecast {}-{:02}: {}\n",
        params.year,
        params.month,
        format_int(summary.forecast_value)
    ));
    out.push_str(&format_outcome(&summary.forecast, config));
    out
}

/// One-paragraph description of a forecast attempt.
pub fn format_outcome(outcome: &ForecastOutcome, config: &ForecastConfig) -> String {
    match outcome {
        ForecastOutcome::Skipped => "Model: skipped (no observations)\n".to_string(),
        ForecastOutcome::FitFailed { train_len, error } => {
            format!(
                "Model: {} failed on {train_len} training months: {error}\n",
                config.order.display_name()
            )
        }
        ForecastOutcome::Fitted {
            train_len,
            params,
            result,
        } => {
            let mut out = format!(
                "Model: {} | train={train_len} | CSS={:.4e} | n_resid={}\n",
                config.order.display_name(),
                params.css,
                params.n_resid
            );
            out.push_str(&format!(
                "- ar={} ma={} sar={} sma={}\n",
                fmt_vec(&params.ar),
                fmt_vec(&params.ma),
                fmt_vec(&params.seasonal_ar),
                fmt_vec(&params.seasonal_ma)
            ));
            if let (Some(first), Some(last)) = (result.first_date(), result.points.last()) {
                out.push_str(&format!("- horizon: {} .. {}\n", ym(first), ym(last.0)));
            }
            out
        }
    }
}

/// The month table (year, month name, then one column per selected category).
pub fn format_month_table(table: &MonthTable) -> String {
    let mut out = String::new();
    if table.columns.is_empty() {
        out.push_str("(no categories selected)\n");
        return out;
    }

    let mut header = format!("{:<6} {:<11}", "AÑO", "MES");
    let mut rule = format!("{:-<6} {:-<11}", "", "");
    for c in &table.columns {
        header.push_str(&format!(" {:>14}", truncate(c.column_name(), 14)));
        rule.push_str(&format!(" {:-<14}", ""));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(rule.trim_end());
    out.push('\n');

    if table.rows.is_empty() {
        out.push_str("(no rows for this month)\n");
        return out;
    }
    for row in &table.rows {
        let mut line = format!("{:<6} {:<11}", row.year, row.month_name);
        for v in &row.values {
            let cell = v.map(format_count).unwrap_or_else(|| "-".to_string());
            line.push_str(&format!(" {cell:>14}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Per-category sums for a year, one per line.
pub fn format_breakdown(breakdown: &[(Category, f64)], year: i32) -> String {
    let mut out = format!("Counts {year}:\n");
    if breakdown.is_empty() {
        out.push_str("  (no categories selected)\n");
        return out;
    }
    for (c, v) in breakdown {
        out.push_str(&format!("  {:<24} {:>14}\n", c.display_name(), format_count(*v)));
    }
    out
}

pub fn format_extremes(extremes: &Extremes, year: i32) -> String {
    match extremes {
        Extremes::InsufficientData => format!("Statistics {year}: insufficient data\n"),
        Extremes::Found { max, min } => format!(
            "Statistics {year}:\n  most:  {} ({})\n  least: {} ({})\n",
            max.0.display_name(),
            format_count(max.1),
            min.0.display_name(),
            format_count(min.1)
        ),
    }
}

/// Per-year totals, one row per year and one column per category.
pub fn format_yearly(yearly: &[YearlyTotals]) -> String {
    let Some(first) = yearly.first() else {
        return "Per year: (no data)\n".to_string();
    };
    let mut out = String::from("Per year:\n");
    let mut header = format!("  {:<6}", "year");
    for y in yearly {
        header.push_str(&format!(" {:>14}", truncate(y.category.column_name(), 14)));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    for (i, (year, _)) in first.totals.iter().enumerate() {
        let mut line = format!("  {year:<6}");
        for y in yearly {
            let v = y.totals.get(i).map(|(_, v)| *v).unwrap_or(0.0);
            line.push_str(&format!(" {:>14}", format_count(v)));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Forecast points as a two-column table.
pub fn format_forecast_points(points: &[(NaiveDate, f64)]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<8} {:>14}\n", "month", "forecast"));
    out.push_str(&format!("{:-<8} {:-<14}\n", "", ""));
    for (d, v) in points {
        out.push_str(&format!("{:<8} {:>14}\n", ym(*d), format_int(v.trunc() as i64)));
    }
    out
}

/// Category keys accepted by `--vehicle`/`--show`, with their source columns.
pub fn format_categories() -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<20} {:<22} {:<14}\n", "key", "column", "icon"));
    out.push_str(&format!("{:-<20} {:-<22} {:-<14}\n", "", "", ""));
    for c in Category::ALL {
        let key = clap::ValueEnum::to_possible_value(&c)
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        out.push_str(
            format!("{:<20} {:<22} {:<14}\n", key, c.column_name(), c.icon())
                .trim_end(),
        );
        out.push('\n');
    }
    out
}

fn ym(d: NaiveDate) -> String {
    d.format("%Y-%m").to_string()
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.4}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MonthTableRow, month_start};

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.4), "999");
        assert_eq!(format_count(1_234_567.8), "1,234,568");
        assert_eq!(format_count(-12_345.0), "-12,345");
        assert_eq!(format_count(f64::NAN), "-");
        assert_eq!(format_int(1000), "1,000");
    }

    #[test]
    fn month_table_renders_nulls_as_dash() {
        let table = MonthTable {
            columns: vec![Category::Autos, Category::Motos],
            rows: vec![MonthTableRow {
                year: 2024,
                month_name: "MARZO".to_string(),
                date: month_start(2024, 3).unwrap(),
                values: vec![Some(1500.0), None],
            }],
        };
        let out = format_month_table(&table);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("AÑO"));
        assert!(lines[2].contains("1,500"));
        assert!(lines[2].ends_with('-'));
    }

    #[test]
    fn extremes_text() {
        let text = format_extremes(&Extremes::InsufficientData, 2024);
        assert!(text.contains("insufficient data"));
        let text = format_extremes(
            &Extremes::Found {
                max: (Category::Autos, 10.0),
                min: (Category::Motos, 2.0),
            },
            2024,
        );
        assert!(text.contains("most:  Autos (10)"));
        assert!(text.contains("least: Motos (2)"));
    }

    #[test]
    fn categories_list_every_key() {
        let out = format_categories();
        assert_eq!(out.lines().count(), Category::COUNT + 2);
        assert!(out.contains("camion-9"));
        assert!(out.contains("EJE EXTRA CAMION"));
    }

    #[test]
    fn skipped_outcome_is_explained() {
        let text = format_outcome(&ForecastOutcome::Skipped, &ForecastConfig::default());
        assert!(text.contains("skipped"));
    }
}
