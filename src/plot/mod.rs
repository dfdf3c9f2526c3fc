//! Chart data for the sentiment/price overlay
//!
//! Loads the sentiment-augmented news files and the accumulated price
//! export, aligns both by intraday time-of-day, and produces one chart's
//! worth of series per ticker. The calendar date is discarded during
//! alignment: every sample is projected onto a single dummy day, so
//! captures spanning several days collapse onto one axis.

pub mod view;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::analyze::SENTIMENT_SUFFIX;
use crate::table::{Table, EXPORTED_AT_FORMAT, NEWS_DATE_FORMAT};

/// The dummy day every sample is projected onto.
fn plot_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).expect("fixed date")
}

/// One aligned observation: dummy-day timestamp plus a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub time: NaiveDateTime,
    pub value: f64,
}

/// Everything needed to draw one ticker's chart.
#[derive(Debug, Clone)]
pub struct TickerChart {
    pub ticker: String,
    pub sentiment: Vec<SeriesPoint>,
    pub price: Vec<SeriesPoint>,
}

impl TickerChart {
    pub fn is_empty(&self) -> bool {
        self.sentiment.is_empty() && self.price.is_empty()
    }
}

/// Load chart data for every ticker that has a sentiment file in
/// `data_dir`. Tickers come from the file-name prefix; price series are
/// matched from the accumulated `export.csv` and may be empty. A ticker
/// with zero aligned rows still gets a (blank) chart.
pub fn load_chart_data(data_dir: &Path) -> Result<Vec<TickerChart>> {
    let suffix = format!("{}.csv", SENTIMENT_SUFFIX);
    let mut sentiment_by_ticker: HashMap<String, Vec<SeriesPoint>> = HashMap::new();

    let entries = std::fs::read_dir(data_dir)
        .with_context(|| format!("Failed to list data directory {:?}", data_dir))?;
    for entry in entries {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(&suffix) {
            continue;
        }
        let ticker = name.split('_').next().unwrap_or_default().to_string();
        if ticker.is_empty() {
            continue;
        }

        match load_sentiment_series(&path) {
            Ok(points) => {
                info!("Loaded {} sentiment rows for {}", points.len(), ticker);
                sentiment_by_ticker.entry(ticker).or_default().extend(points);
            }
            Err(e) => warn!("Skipping sentiment file {:?}: {:#}", path, e),
        }
    }

    let price_path = data_dir.join("export.csv");
    let mut price_by_ticker = if price_path.exists() {
        match load_price_series(&price_path) {
            Ok(series) => series,
            Err(e) => {
                warn!("Skipping price file {:?}: {:#}", price_path, e);
                HashMap::new()
            }
        }
    } else {
        HashMap::new()
    };

    let charts = sentiment_by_ticker
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .map(|(ticker, mut sentiment)| {
            sentiment.sort_by_key(|p| p.time);
            let mut price = price_by_ticker.remove(&ticker).unwrap_or_default();
            price.sort_by_key(|p| p.time);
            TickerChart {
                ticker,
                sentiment,
                price,
            }
        })
        .collect();

    Ok(charts)
}

/// Read `Date` / `Combined_Sentiment` pairs from a sentiment file,
/// dropping rows whose timestamp or score fails to parse.
fn load_sentiment_series(path: &Path) -> Result<Vec<SeriesPoint>> {
    let table = Table::from_csv_path(path)?;
    let mut points = Vec::new();

    for idx in 0..table.len() {
        let Some(stamp) = table.get(idx, "Date") else {
            continue;
        };
        let Ok(parsed) = NaiveDateTime::parse_from_str(stamp, NEWS_DATE_FORMAT) else {
            continue;
        };
        let Some(value) = table
            .get(idx, "Combined_Sentiment")
            .and_then(|v| v.parse::<f64>().ok())
        else {
            continue;
        };
        points.push(SeriesPoint {
            time: align_time_of_day(parsed),
            value,
        });
    }

    Ok(points)
}

/// Read `Ticker` / `Price` / `Exported_At` rows from the price export,
/// grouped by ticker, dropping unparsable rows.
fn load_price_series(path: &Path) -> Result<HashMap<String, Vec<SeriesPoint>>> {
    let table = Table::from_csv_path(path)?;
    let mut series: HashMap<String, Vec<SeriesPoint>> = HashMap::new();

    for idx in 0..table.len() {
        let Some(ticker) = table.get(idx, "Ticker").filter(|t| !t.is_empty()) else {
            continue;
        };
        let Some(stamp) = table.get(idx, "Exported_At") else {
            continue;
        };
        let Ok(parsed) = NaiveDateTime::parse_from_str(stamp, EXPORTED_AT_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(stamp, NEWS_DATE_FORMAT))
        else {
            continue;
        };
        let Some(value) = table.get(idx, "Price").and_then(|v| v.parse::<f64>().ok()) else {
            continue;
        };
        series.entry(ticker.to_string()).or_default().push(SeriesPoint {
            time: align_time_of_day(parsed),
            value,
        });
    }

    Ok(series)
}

/// Discard the calendar date, projecting a timestamp onto the dummy day.
pub fn align_time_of_day(stamp: NaiveDateTime) -> NaiveDateTime {
    plot_epoch().and_time(stamp.time())
}

/// Minimum and maximum value over a series; `None` when empty.
pub fn series_bounds(points: &[SeriesPoint]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|p| p.value)
        .fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Linearly rescale `value` from `from` into `to`. A degenerate source
/// range maps everything onto the middle of the target.
pub fn rescale(value: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let (f0, f1) = from;
    let (t0, t1) = to;
    if (f1 - f0).abs() < f64::EPSILON {
        return (t0 + t1) / 2.0;
    }
    t0 + (value - f0) / (f1 - f0) * (t1 - t0)
}
