//! Per-ticker headline capture
//!
//! Scrapes the quote page's news table for each configured ticker, keeps
//! only today's items, and appends them (newest first) to the ticker's
//! `<ticker>_today_news.csv` file. A day with no items still leaves a
//! header-only file behind. A ticker whose page cannot be fetched is
//! skipped for this run; the others still get captured.

use chrono::{Local, NaiveDate};
use itertools::Itertools;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::fetch::fetch_quote_page;
use crate::scrape::{news_items_to_table, parse_news_table, NewsItem};
use crate::store::append_table;

/// Capture today's headlines for every configured ticker. Returns how
/// many items were stored per ticker, in configuration order.
pub async fn capture_today_news(client: &Client, config: &Config) -> Result<Vec<(String, usize)>> {
    let today = Local::now().date_naive();
    let mut captured = Vec::new();

    for ticker in &config.tickers {
        info!("Fetching news for ticker: {}", ticker);

        let html = match fetch_quote_page(client, &config.quote_page_url, ticker).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Skipping {}: {:#}", ticker, e);
                captured.push((ticker.clone(), 0));
                continue;
            }
        };

        let items = match parse_news_table(&html, today) {
            Ok(items) => items,
            Err(e) => {
                warn!("Could not parse news table for {}: {:#}", ticker, e);
                captured.push((ticker.clone(), 0));
                continue;
            }
        };

        let todays = select_todays_items(items, today);
        let count = todays.len();

        // An empty capture still writes the header on first use
        append_table(&config.news_path(ticker), &news_items_to_table(&todays))?;

        info!("Saved {} of today's headlines for {}", count, ticker);
        captured.push((ticker.clone(), count));
    }

    Ok(captured)
}

/// Keep only items dated today, sorted by date descending (newest first).
fn select_todays_items(items: Vec<NewsItem>, today: NaiveDate) -> Vec<NewsItem> {
    items
        .into_iter()
        .filter(|item| item.date.date() == today)
        .sorted_by(|a, b| b.date.cmp(&a.date))
        .collect()
}
