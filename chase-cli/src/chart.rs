//! Terminal bar and pie charts.

use anyhow::Result;
use chase_finance::chart::{ChartSeries, MovingAverageLine, pie_slices};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};
use std::io::{self, Stdout, Write};

use crate::report::{Painter, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pie,
}

const PALETTE: [Color; 8] = [
    Color::Blue,
    Color::Yellow,
    Color::Green,
    Color::Red,
    Color::Magenta,
    Color::Cyan,
    Color::LightBlue,
    Color::LightYellow,
];

/// Print the plotted values, then open the chart until `q` or `Esc`.
pub fn display<W: Write>(out: &mut W, series: &ChartSeries, kind: ChartKind, painter: Painter) -> Result<()> {
    write_series(out, series, painter)?;
    out.flush()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = chart_loop(&mut terminal, series, kind);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn chart_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    series: &ChartSeries,
    kind: ChartKind,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, series, kind))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// One `value label` line per plotted item.
pub fn write_series<W: Write>(out: &mut W, series: &ChartSeries, painter: Painter) -> io::Result<()> {
    for (label, value) in series.labels.iter().zip(&series.values) {
        let line = format!("{value:>10} {label}");
        writeln!(out, "{}", painter.paint(Tone::Total, &line))?;
    }
    Ok(())
}

pub fn draw(f: &mut Frame, series: &ChartSeries, kind: ChartKind) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    match kind {
        ChartKind::Bar => match &series.moving_average {
            Some(ma) => {
                let panels = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(chunks[0]);
                draw_bars(f, panels[0], series);
                draw_moving_average(f, panels[1], series, ma);
            }
            None => draw_bars(f, chunks[0], series),
        },
        ChartKind::Pie => draw_pie(f, chunks[0], series),
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        "q/Esc to close",
        Style::default().fg(Color::Gray),
    )));
    f.render_widget(footer, chunks[1]);
}

fn titled_block(series: &ChartSeries) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            series.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .title_bottom(format!("{} / {}", series.x_label, series.y_label))
}

fn bar_width(area: Rect, n: usize) -> u16 {
    if n == 0 {
        return 1;
    }
    let per_bar = area.width.saturating_sub(2) / n as u16;
    per_bar.saturating_sub(1).clamp(1, 12)
}

fn draw_bars(f: &mut Frame, area: Rect, series: &ChartSeries) {
    // Bars are drawn by magnitude; credits are marked red and keep their sign in the value text.
    let bars: Vec<Bar> = series
        .labels
        .iter()
        .zip(&series.values)
        .enumerate()
        .map(|(i, (label, &value))| {
            let color = if value < 0 {
                Color::Red
            } else {
                PALETTE[i % PALETTE.len()]
            };
            Bar::default()
                .value(value.unsigned_abs())
                .text_value(format!("${value}"))
                .label(Line::from(label.clone()))
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(titled_block(series))
        .bar_width(bar_width(area, bars.len()))
        .bar_gap(1)
        .value_style(Style::default().fg(Color::Black).bg(Color::White))
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

fn draw_moving_average(f: &mut Frame, area: Rect, series: &ChartSeries, ma: &MovingAverageLine) {
    let totals: Vec<(f64, f64)> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v as f64))
        .collect();
    let averages: Vec<(f64, f64)> = ma
        .points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.map(|v| (i as f64, v)))
        .collect();

    let lo = totals.iter().map(|p| p.1).fold(0.0, f64::min);
    let hi = totals.iter().map(|p| p.1).fold(0.0, f64::max);
    let hi = if hi > lo { hi } else { lo + 1.0 };
    let x_max = (series.values.len().max(2) - 1) as f64;

    let x_labels: Vec<Span> = match (series.labels.first(), series.labels.last()) {
        (Some(first), Some(last)) => vec![Span::raw(first.clone()), Span::raw(last.clone())],
        _ => Vec::new(),
    };

    let datasets = vec![
        Dataset::default()
            .name(series.y_label.clone())
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Cyan))
            .data(&totals),
        Dataset::default()
            .name(ma.label())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&averages),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(ma.label()))
        .x_axis(
            Axis::default()
                .title(series.x_label.clone())
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(series.y_label.clone())
                .bounds([lo, hi])
                .labels(vec![Span::raw(format!("{lo:.0}")), Span::raw(format!("{hi:.0}"))]),
        );
    f.render_widget(chart, area);
}

/// Columns of the share bar for a slice of `percent`.
pub fn share_width(percent: f64, width: u16) -> u16 {
    ((percent / 100.0) * f64::from(width)).round().clamp(0.0, f64::from(width)) as u16
}

fn draw_pie(f: &mut Frame, area: Rect, series: &ChartSeries) {
    let slices = pie_slices(series);
    let label_width = slices
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);
    // Border, label, percent and amount columns.
    let bar_room = area
        .width
        .saturating_sub(label_width as u16 + 24)
        .max(10);

    let lines: Vec<Line> = slices
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let color = PALETTE[i % PALETTE.len()];
            let label: String = s.label.chars().take(label_width).collect();
            let width = share_width(s.percent, bar_room) as usize;
            Line::from(vec![
                Span::styled(format!("{label:<label_width$} "), Style::default().fg(color)),
                Span::styled("█".repeat(width), Style::default().fg(color)),
                Span::raw(format!(" {:>3.0}% ${}", s.percent, s.value)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(titled_block(series)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn series(moving_average: Option<MovingAverageLine>) -> ChartSeries {
        ChartSeries {
            title: "Category Totals over 5 Months from 2024-01-01 to 2024-06-01".to_string(),
            x_label: "Categories".to_string(),
            y_label: "Total".to_string(),
            labels: vec!["Groceries".into(), "Dining".into(), "Payment".into()],
            values: vec![501, 120, -500],
            moving_average,
        }
    }

    fn screen(series: &ChartSeries, kind: ChartKind) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw(f, series, kind)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_bar_chart_shows_title_and_labels() {
        let s = series(None);
        let text = screen(&s, ChartKind::Bar);
        assert!(text.contains(&s.title));
        assert!(text.contains("Groceries"));
        assert!(text.contains("q/Esc to close"));
    }

    #[test]
    fn test_bar_chart_with_moving_average_panel() {
        let ma = MovingAverageLine {
            window: 3,
            points: vec![None, None, Some(40.33)],
        };
        let s = series(Some(ma));
        let text = screen(&s, ChartKind::Bar);
        assert!(text.contains("3-Month Moving Average"));
    }

    #[test]
    fn test_pie_rows_sorted_with_percent() {
        let s = series(None);
        let text = screen(&s, ChartKind::Pie);
        let groceries = text.find("Groceries").unwrap();
        let payment = text.find("Payment").unwrap();
        let dining = text.find("Dining").unwrap();
        assert!(groceries < payment && payment < dining);
        assert!(text.contains("$-500"));
        // 501 of 1121
        assert!(text.contains(" 45% $501"));
    }

    #[test]
    fn test_share_width() {
        assert_eq!(share_width(50.0, 40), 20);
        assert_eq!(share_width(0.0, 40), 0);
        assert_eq!(share_width(100.0, 40), 40);
        assert_eq!(share_width(130.0, 40), 40);
    }

    #[test]
    fn test_write_series() {
        let mut buf = Vec::new();
        write_series(&mut buf, &series(None), Painter::new(false)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next(), Some("       501 Groceries"));
        assert_eq!(text.lines().count(), 3);
    }
}
