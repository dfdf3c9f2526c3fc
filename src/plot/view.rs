//! Terminal chart viewer
//!
//! Renders one chart per ticker in an alternate-screen ratatui session.
//! Sentiment draws on its natural [-1, 1] axis; the price series is
//! rescaled into the same plot area with its real range shown in the
//! legend, giving the two series independent y-scales. Left/right (or
//! tab) cycles tickers, q or Esc quits.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tabled::settings::Style as TableStyle;
use tabled::{Table as TextTable, Tabled};

use super::{rescale, series_bounds, SeriesPoint, TickerChart};

const SENTIMENT_BOUNDS: (f64, f64) = (-1.0, 1.0);

/// Run the interactive viewer over the loaded charts.
pub fn run_viewer(charts: &[TickerChart]) -> Result<()> {
    if charts.is_empty() {
        println!("No sentiment data found; nothing to plot.");
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_loop(&mut terminal, charts);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, charts: &[TickerChart]) -> Result<()> {
    let mut selected = 0usize;

    loop {
        let chart = &charts[selected];
        terminal.draw(|frame| {
            let area = frame.area();
            draw_chart(frame, area, chart, selected, charts.len());
        })?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Right | KeyCode::Tab => {
                    selected = (selected + 1) % charts.len();
                }
                KeyCode::Left => {
                    selected = (selected + charts.len() - 1) % charts.len();
                }
                _ => {}
            }
        }
    }
}

fn draw_chart(frame: &mut Frame, area: Rect, chart: &TickerChart, index: usize, total: usize) {
    let sentiment_data: Vec<(f64, f64)> = chart
        .sentiment
        .iter()
        .map(|p| (seconds_of_day(p), p.value))
        .collect();

    let price_bounds = series_bounds(&chart.price);
    let price_data: Vec<(f64, f64)> = chart
        .price
        .iter()
        .map(|p| {
            let scaled = match price_bounds {
                Some(bounds) => rescale(p.value, bounds, SENTIMENT_BOUNDS),
                None => 0.0,
            };
            (seconds_of_day(p), scaled)
        })
        .collect();

    let price_label = match price_bounds {
        Some((min, max)) => format!("{} Price [{:.2} .. {:.2}]", chart.ticker, min, max),
        None => format!("{} Price (no data)", chart.ticker),
    };

    let datasets = vec![
        Dataset::default()
            .name(format!("{} Sentiment", chart.ticker))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&sentiment_data),
        Dataset::default()
            .name(price_label)
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&price_data),
    ];

    let title = format!(
        " Sentiment and Price over Time — {} ({}/{}) [←/→ switch, q quit] ",
        chart.ticker,
        index + 1,
        total
    );

    let widget = Chart::new(datasets)
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("Time")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, 86_400.0])
                .labels(vec![
                    Span::raw("00:00"),
                    Span::raw("06:00"),
                    Span::raw("12:00"),
                    Span::raw("18:00"),
                    Span::raw("24:00"),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Combined Sentiment")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([SENTIMENT_BOUNDS.0, SENTIMENT_BOUNDS.1])
                .labels(vec![Span::raw("-1.0"), Span::raw("0.0"), Span::raw("1.0")]),
        );

    frame.render_widget(widget, area);
}

fn seconds_of_day(point: &SeriesPoint) -> f64 {
    use chrono::Timelike;
    point.time.time().num_seconds_from_midnight() as f64
}

#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Series")]
    series: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Plain-text rendition of the aligned series, for non-interactive use.
pub fn dump_series(charts: &[TickerChart]) -> String {
    let mut rows = Vec::new();
    for chart in charts {
        for point in &chart.sentiment {
            rows.push(series_row(&chart.ticker, "sentiment", point));
        }
        for point in &chart.price {
            rows.push(series_row(&chart.ticker, "price", point));
        }
    }

    if rows.is_empty() {
        return "No aligned rows.".to_string();
    }
    TextTable::new(rows).with(TableStyle::rounded()).to_string()
}

fn series_row(ticker: &str, series: &str, point: &SeriesPoint) -> SeriesRow {
    SeriesRow {
        ticker: ticker.to_string(),
        series: series.to_string(),
        time: point.time.format("%H:%M:%S").to_string(),
        value: format!("{:.4}", point.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(h: u32, m: u32, value: f64) -> SeriesPoint {
        SeriesPoint {
            time: NaiveDate::from_ymd_opt(1900, 1, 1)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
            value,
        }
    }

    #[test]
    fn test_seconds_of_day() {
        assert_eq!(seconds_of_day(&point(0, 0, 0.0)), 0.0);
        assert_eq!(seconds_of_day(&point(9, 30, 0.0)), 34_200.0);
    }

    #[test]
    fn test_dump_lists_both_series() {
        let charts = vec![TickerChart {
            ticker: "AAPL".to_string(),
            sentiment: vec![point(9, 30, 0.4)],
            price: vec![point(9, 31, 187.44)],
        }];
        let text = dump_series(&charts);
        assert!(text.contains("AAPL"));
        assert!(text.contains("sentiment"));
        assert!(text.contains("09:31:00"));
        assert!(text.contains("187.4400"));
    }

    #[test]
    fn test_dump_empty_is_friendly() {
        assert_eq!(dump_series(&[]), "No aligned rows.");
    }
}
