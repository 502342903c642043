//! Ratatui-based terminal dashboard.
//!
//! A settings panel chooses the vehicle category, year range, target year and
//! month, and the categories shown in the table and breakdowns. Everything
//! else (value boxes, chart, month table, per-year bars, statistics) is read
//! from the memoized [`Session`] summary.

use std::io;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
};

use crate::app::pipeline::{Session, Summary};
use crate::domain::{Category, Extremes, QueryParams, YearlyTotals};
use crate::error::AppError;
use crate::forecast::{ForecastConfig, ForecastOutcome};
use crate::normalize::{Dataset, MONTH_NAMES};
use crate::query;
use crate::report::format_count;

mod plotters_chart;

use plotters_chart::SeriesChart;

const FIELD_COUNT: usize = 6;
const FIELD_SHOW: usize = 5;

/// Start the dashboard over `dataset`.
pub fn run(dataset: &Dataset, config: ForecastConfig, params: QueryParams) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(dataset, config, params);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App<'a> {
    session: Session<'a>,
    params: QueryParams,
    /// Inclusive year bounds the sliders are clamped to.
    years: (i32, i32),
    selected_field: usize,
    /// Category under the cursor in the "Show" field.
    show_cursor: Category,
    status: String,
}

impl<'a> App<'a> {
    fn new(dataset: &'a Dataset, config: ForecastConfig, params: QueryParams) -> Self {
        let (lo, hi) = dataset.year_bounds().unwrap_or((params.year_from, params.year_to));
        // Forecasts reach three years past the data.
        let years = (lo.min(params.year_from), hi.max(params.year_to).max(params.year).max(hi + 3));
        Self {
            session: Session::new(dataset, config),
            params,
            years,
            selected_field: 0,
            show_cursor: Category::Autos,
            status: format!("{} rows loaded", dataset.records().len()),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FIELD_COUNT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char(' ') | KeyCode::Enter if self.selected_field == FIELD_SHOW => {
                self.toggle_shown(self.show_cursor);
            }
            KeyCode::Char('a') => {
                self.params.selected = Category::ALL.to_vec();
                self.status = "showing all categories".to_string();
            }
            KeyCode::Char('c') => {
                self.params.selected.clear();
                self.status = "cleared category selection".to_string();
            }
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: i32) {
        let (lo, hi) = self.years;
        let p = &mut self.params;
        match self.selected_field {
            0 => {
                p.category = if delta >= 0 { p.category.next() } else { p.category.prev() };
                self.status = format!("vehicle: {}", p.category.display_name());
            }
            1 => {
                p.year_from = (p.year_from + delta).clamp(lo, p.year_to);
                self.status = format!("from: {}", p.year_from);
            }
            2 => {
                p.year_to = (p.year_to + delta).clamp(p.year_from, hi);
                self.status = format!("to: {}", p.year_to);
            }
            3 => {
                p.year = (p.year + delta).clamp(lo, hi);
                self.status = format!("year: {}", p.year);
            }
            4 => {
                let m = p.month as i32 + delta;
                p.month = if m < 1 { 12 } else if m > 12 { 1 } else { m as u32 };
                self.status = format!("month: {}", month_label(p.month));
            }
            FIELD_SHOW => {
                self.show_cursor = if delta >= 0 { self.show_cursor.next() } else { self.show_cursor.prev() };
            }
            _ => {}
        }
    }

    /// Toggle `category`, keeping the selection in column order.
    fn toggle_shown(&mut self, category: Category) {
        let selected = &mut self.params.selected;
        if let Some(pos) = selected.iter().position(|c| *c == category) {
            selected.remove(pos);
        } else {
            selected.push(category);
            selected.sort_by_key(|c| c.index());
        }
        self.status = format!("{} categories shown", selected.len());
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(12),
                Constraint::Length(12),
                Constraint::Length(3),
            ])
            .split(size);

        let params = self.params.clone();
        let dataset = self.session.dataset();
        let cadence = query::cadence_label(dataset, params.category, params.year_from, params.year_to);
        let breakdown = query::category_breakdown(dataset, &params.selected, params.year);
        let extremes = query::extremes(dataset, &params.selected, params.year);
        let yearly = query::yearly_breakdown(dataset, &params.selected, params.year_from, params.year_to);
        let recomputations = self.session.recomputations();
        let summary = self.session.summary(&params);

        draw_value_boxes(frame, chunks[0], &params, summary, cadence.display_name());

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
            .split(chunks[1]);
        draw_chart(frame, middle[0], summary);
        draw_settings(frame, middle[1], &params, self.selected_field, self.show_cursor);

        let lower = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(42),
                Constraint::Percentage(33),
                Constraint::Percentage(25),
            ])
            .split(chunks[2]);
        draw_month_table(frame, lower[0], summary);
        draw_yearly_bars(frame, lower[1], &yearly);
        draw_stats(frame, lower[2], params.year, &breakdown, &extremes);

        draw_footer(frame, chunks[3], &self.status, recomputations);
    }
}

fn draw_value_boxes(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    params: &QueryParams,
    summary: &Summary,
    cadence: &str,
) {
    let boxes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let value_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(Color::Gray);

    let total = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            format!("{} [{}]", params.category.display_name(), params.category.icon()),
            label_style,
        )),
        Line::from(Span::styled(format_count(summary.total), value_style)),
    ]))
    .block(
        Block::default()
            .title(format!("Total {}-{}", params.year_from, params.year_to))
            .borders(Borders::ALL),
    );
    frame.render_widget(total, boxes[0]);

    let note = match &summary.forecast {
        ForecastOutcome::Fitted { .. } if summary.forecast_value == 0 => "outside forecast horizon".to_string(),
        ForecastOutcome::Fitted { train_len, .. } => format!("trained on {train_len} months"),
        ForecastOutcome::Skipped => "no observations".to_string(),
        ForecastOutcome::FitFailed { error, .. } => error.to_string(),
    };
    let forecast = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(note, label_style)),
        Line::from(Span::styled(format_count(summary.forecast_value as f64), value_style)),
    ]))
    .block(
        Block::default()
            .title(format!(
                "Forecast {} {}",
                month_label(params.month),
                params.year
            ))
            .borders(Borders::ALL),
    );
    frame.render_widget(forecast, boxes[1]);

    let frequency = Paragraph::new(Text::from(vec![
        Line::from(Span::styled("data cadence", label_style)),
        Line::from(Span::styled(cadence.to_string(), value_style)),
    ]))
    .block(Block::default().title("Frequency").borders(Borders::ALL));
    frame.render_widget(frequency, boxes[2]);
}

fn draw_chart(frame: &mut ratatui::Frame<'_>, area: Rect, summary: &Summary) {
    let block = Block::default()
        .title(format!("{} monthly", summary.series.category.display_name()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    if summary.series.is_empty() {
        let msg = Paragraph::new("No observations for this category.")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default());
        frame.render_widget(msg, inner);
        return;
    }

    let (observed, forecast, split, x_bounds, y_bounds) = chart_series(summary);
    let (chart_rect, insets) = chart_layout(inner);
    let widget = SeriesChart {
        observed: &observed,
        forecast: &forecast,
        split,
        x_bounds,
        y_bounds,
        x_label: "year",
        y_label: "vehicles".to_string(),
        fmt_x: fmt_axis_year,
        fmt_y: fmt_axis_count,
    };

    frame.render_widget(widget, chart_rect);
    if let Some(insets) = insets {
        draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds);
    }
}

fn draw_settings(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    params: &QueryParams,
    selected_field: usize,
    show_cursor: Category,
) {
    let shown = if params.selected.is_empty() {
        "none".to_string()
    } else {
        format!("{} selected", params.selected.len())
    };
    let mark = if params.selected.contains(&show_cursor) { "x" } else { " " };

    let items = vec![
        ListItem::new(format!("Vehicle: {}", params.category.display_name())),
        ListItem::new(format!("From: {}", params.year_from)),
        ListItem::new(format!("To: {}", params.year_to)),
        ListItem::new(format!("Year: {}", params.year)),
        ListItem::new(format!("Month: {}", month_label(params.month))),
        ListItem::new(format!("Show: [{mark}] {} ({shown})", show_cursor.display_name())),
    ];

    let list = List::new(items)
        .block(Block::default().title("Settings").borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
        .highlight_symbol("» ");

    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(selected_field));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_month_table(frame: &mut ratatui::Frame<'_>, area: Rect, summary: &Summary) {
    let table = &summary.table;
    let block = Block::default().title("Month table").borders(Borders::ALL);

    if table.columns.is_empty() || table.rows.is_empty() {
        let msg = if table.columns.is_empty() {
            "Select categories with ←/→ and Space."
        } else {
            "No rows for this month."
        };
        let p = Paragraph::new(msg).style(Style::default().fg(Color::Gray)).block(block);
        frame.render_widget(p, area);
        return;
    }

    let mut header = vec![Cell::from("AÑO"), Cell::from("MES")];
    header.extend(table.columns.iter().map(|c| Cell::from(c.column_name())));

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|r| {
            let mut cells = vec![Cell::from(r.year.to_string()), Cell::from(r.month_name.clone())];
            cells.extend(
                r.values
                    .iter()
                    .map(|v| Cell::from(v.map(format_count).unwrap_or_else(|| "-".to_string()))),
            );
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(5), Constraint::Length(11)];
    widths.extend(table.columns.iter().map(|_| Constraint::Length(12)));

    let t = Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().fg(Color::Cyan)))
        .block(block);
    frame.render_widget(t, area);
}

fn draw_yearly_bars(frame: &mut ratatui::Frame<'_>, area: Rect, yearly: &[YearlyTotals]) {
    let block = Block::default().title("Per year").borders(Borders::ALL);
    let Some(first) = yearly.first() else {
        let p = Paragraph::new("No data for the selection.")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(p, area);
        return;
    };

    let groups: Vec<(i32, Vec<Bar>)> = first
        .totals
        .iter()
        .enumerate()
        .map(|(i, (year, _))| {
            let bars = yearly
                .iter()
                .map(|y| {
                    let v = y.totals.get(i).map(|(_, v)| *v).unwrap_or(0.0).max(0.0);
                    Bar::default()
                        .value(v.round() as u64)
                        .text_value(fmt_compact(v))
                        .style(Style::default().fg(bar_color(y.category)))
                })
                .collect();
            (*year, bars)
        })
        .collect();

    let mut chart = BarChart::default().block(block).bar_width(4).bar_gap(0).group_gap(2);
    for (year, bars) in &groups {
        chart = chart.data(BarGroup::default().label(Line::from(year.to_string())).bars(bars));
    }
    frame.render_widget(chart, area);
}

fn draw_stats(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    year: i32,
    breakdown: &[(Category, f64)],
    extremes: &Extremes,
) {
    let mut lines = Vec::new();
    match extremes {
        Extremes::InsufficientData => {
            lines.push(Line::from(Span::styled(
                "Insufficient data",
                Style::default().fg(Color::Yellow),
            )));
        }
        Extremes::Found { max, min } => {
            lines.push(Line::from(format!("max: {} ({})", max.0.display_name(), format_count(max.1))));
            lines.push(Line::from(format!("min: {} ({})", min.0.display_name(), format_count(min.1))));
        }
    }
    lines.push(Line::from(""));
    for (c, v) in breakdown {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<6} ", c.icon()), Style::default().fg(bar_color(*c))),
            Span::raw(format!("{} {}", c.display_name(), format_count(*v))),
        ]));
    }

    let p = Paragraph::new(Text::from(lines))
        .block(Block::default().title(format!("Statistics {year}")).borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn draw_footer(frame: &mut ratatui::Frame<'_>, area: Rect, status: &str, recomputations: usize) {
    let help = "↑/↓ select  ←/→ adjust  Space toggle  a all  c clear  q quit";
    let line = Line::from(vec![
        Span::styled(help, Style::default().fg(Color::Gray)),
        Span::raw(" | "),
        Span::styled(status, Style::default().fg(Color::Yellow)),
        Span::styled(format!(" | fits: {recomputations}"), Style::default().fg(Color::DarkGray)),
    ]);
    let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn month_label(month: u32) -> &'static str {
    (month as usize)
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i))
        .copied()
        .unwrap_or("?")
}

fn year_fraction(d: NaiveDate) -> f64 {
    f64::from(d.year()) + f64::from(d.month0()) / 12.0
}

/// Build chart series (x in fractional years) and bounds.
fn chart_series(
    summary: &Summary,
) -> (Vec<(f64, f64)>, Vec<(f64, f64)>, Option<f64>, [f64; 2], [f64; 2]) {
    let observed: Vec<(f64, f64)> = summary
        .series
        .points
        .iter()
        .map(|(d, v)| (year_fraction(*d), *v))
        .collect();
    let forecast: Vec<(f64, f64)> = summary
        .forecast
        .points()
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|(d, v)| (year_fraction(*d), *v))
        .collect();
    let split = match &summary.forecast {
        ForecastOutcome::Fitted { train_len, .. } => observed.get(*train_len).map(|(x, _)| *x),
        _ => None,
    };

    let xs = observed.iter().chain(forecast.iter()).map(|p| p.0);
    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    for x in xs {
        x0 = x0.min(x);
        x1 = x1.max(x);
    }
    if !x0.is_finite() || !x1.is_finite() || x1 <= x0 {
        x0 = 0.0;
        x1 = 1.0;
    }

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in observed.iter().chain(forecast.iter()) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = y_max.max(1.0);
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    (observed, forecast, split, [x0, x1], [y_min - pad, y_max + pad])
}

fn bar_color(c: Category) -> Color {
    const PALETTE: [Color; 6] = [
        Color::Cyan,
        Color::Yellow,
        Color::Green,
        Color::Magenta,
        Color::Blue,
        Color::Red,
    ];
    PALETTE[c.index() % PALETTE.len()]
}

/// `15_234_000` → `"15.2M"`.
fn fmt_compact(v: f64) -> String {
    let a = v.abs();
    if a >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if a >= 1e3 {
        format!("{:.0}k", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_count(v: f64) -> String {
    fmt_compact(v)
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_year(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_compact(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("year")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::{SyntheticConfig, demo_dataset};

    fn app(dataset: &Dataset) -> App<'_> {
        App::new(dataset, ForecastConfig::default(), QueryParams::default())
    }

    #[test]
    fn month_wraps_around() {
        let ds = demo_dataset(&SyntheticConfig::default()).unwrap();
        let mut app = app(&ds);
        app.selected_field = 4;
        app.params.month = 12;
        app.adjust_field(1);
        assert_eq!(app.params.month, 1);
        app.adjust_field(-1);
        assert_eq!(app.params.month, 12);
    }

    #[test]
    fn year_range_stays_ordered() {
        let ds = demo_dataset(&SyntheticConfig::default()).unwrap();
        let mut app = app(&ds);
        app.params.year_from = 2022;
        app.params.year_to = 2022;
        app.selected_field = 1;
        app.adjust_field(1);
        assert_eq!(app.params.year_from, 2022);
        app.selected_field = 2;
        app.adjust_field(-1);
        assert_eq!(app.params.year_to, 2022);
    }

    #[test]
    fn toggling_keeps_column_order() {
        let ds = demo_dataset(&SyntheticConfig::default()).unwrap();
        let mut app = app(&ds);
        app.toggle_shown(Category::Camion2);
        app.toggle_shown(Category::Autos);
        assert_eq!(app.params.selected, vec![Category::Autos, Category::Camion2]);
        app.toggle_shown(Category::Autos);
        assert_eq!(app.params.selected, vec![Category::Camion2]);
    }

    #[test]
    fn quit_keys() {
        let ds = demo_dataset(&SyntheticConfig::default()).unwrap();
        let mut app = app(&ds);
        assert!(!app.handle_key(KeyCode::Down));
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn compact_numbers() {
        assert_eq!(fmt_compact(15_234_000.0), "15.2M");
        assert_eq!(fmt_compact(42_400.0), "42k");
        assert_eq!(fmt_compact(950.0), "950");
    }
}
