//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output
//!
//! Plot elements:
//! - observed monthly series: `*` points joined by `-`
//! - forecast: `:` line
//! - train/holdout split: `|` column

use chrono::NaiveDate;

use crate::domain::{TimeSeries, months_between};

/// Render the observed series and (optionally) its forecast on one grid.
///
/// `split` is the index of the first holdout point, drawn as a vertical marker.
pub fn render_series_plot(
    series: &TimeSeries,
    forecast: &[(NaiveDate, f64)],
    split: Option<usize>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some(origin) = series.first_date().or_else(|| forecast.first().map(|(d, _)| *d)) else {
        return "Plot: (no data)\n".to_string();
    };

    let observed: Vec<(f64, f64)> = series
        .points
        .iter()
        .map(|(d, v)| (f64::from(months_between(origin, *d)), *v))
        .collect();
    let predicted: Vec<(f64, f64)> = forecast
        .iter()
        .map(|(d, v)| (f64::from(months_between(origin, *d)), *v))
        .collect();

    let all = observed.iter().chain(predicted.iter());
    let (x_min, x_max) = range(all.clone().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = range(all.map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    if let Some(&(x, _)) = split.and_then(|idx| observed.get(idx)) {
        let col = map_x(x, x_min, x_max, width);
        for row in grid.iter_mut() {
            row[col] = '|';
        }
    }

    draw_curve(&mut grid, &predicted, x_min, x_max, y_min, y_max, ':');
    draw_curve(&mut grid, &observed, x_min, x_max, y_min, y_max, '-');
    for &(x, y) in &observed {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = '*';
    }

    let last = forecast
        .last()
        .map(|(d, _)| *d)
        .or_else(|| series.last_date())
        .unwrap_or(origin);

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} .. {} | y=[{y_min:.0}, {y_max:.0}]\n",
        origin.format("%Y-%m"),
        last.format("%Y-%m")
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min { Some((min, max)) } else { Some((min - 1.0, max + 1.0)) }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64, ch: char) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve.iter().filter(|(_, y)| y.is_finite()) {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, ch);
        } else {
            grid[row][col] = ch;
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && matches!(grid[y0 as usize][x0 as usize], ' ' | '|')
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, add_months, month_start};

    fn series(values: &[f64]) -> TimeSeries {
        let start = month_start(2021, 1).unwrap();
        TimeSeries {
            category: Category::Autos,
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| (add_months(start, i as u32).unwrap(), *v))
                .collect(),
        }
    }

    #[test]
    fn flat_series_golden_snapshot() {
        let txt = render_series_plot(&series(&[5.0; 10]), &[], None, 10, 5);
        let expected = concat!(
            "Plot: 2021-01 .. 2021-10 | y=[4, 6]\n",
            "\n",
            "\n",
            "**********\n",
            "\n",
            "\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn forecast_extends_to_the_right() {
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let forecast: Vec<(NaiveDate, f64)> = (5..10)
            .map(|i| (add_months(month_start(2021, 1).unwrap(), i).unwrap(), f64::from(i + 1)))
            .collect();
        let txt = render_series_plot(&s, &forecast, Some(4), 20, 8);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].contains("2021-01 .. 2021-10"));
        // Highest forecast value sits in the top-right corner.
        assert!(lines[1].ends_with(':'));
        assert!(txt.contains('|'));
        assert!(lines.last().unwrap().starts_with('*'));
    }

    #[test]
    fn empty_input_is_reported() {
        let txt = render_series_plot(&TimeSeries::empty(Category::Motos), &[], None, 20, 8);
        assert_eq!(txt, "Plot: (no data)\n");
    }
}
