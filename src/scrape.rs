//! HTML extraction
//!
//! Two consumers: article bodies are reduced to their paragraph text for
//! sentiment scoring, and the provider's quote page is mined for its news
//! table (date, headline, link).

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use scraper::{Html, Selector};
use tracing::debug;

use crate::table::{Table, NEWS_DATE_FORMAT};

/// Concatenate the text content of every `<p>` element, in document order,
/// joined by single spaces. No paragraphs means an empty string, which
/// downstream logic treats the same as a failed fetch.
pub fn extract_paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let paragraph_sel = match Selector::parse("p") {
        Ok(sel) => sel,
        Err(_) => return String::new(),
    };

    let paragraphs: Vec<String> = document
        .select(&paragraph_sel)
        .map(|node| node.text().collect::<String>())
        .collect();

    paragraphs.join(" ")
}

/// One headline scraped off the quote page.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub date: NaiveDateTime,
    pub title: String,
    pub link: String,
}

/// Parse the quote page's news table into headline items.
///
/// The table carries a full date only on the first row of each day; later
/// rows repeat just the time, so the date carries forward while scanning.
pub fn parse_news_table(html: &str, today: NaiveDate) -> Result<Vec<NewsItem>> {
    let document = Html::parse_document(html);
    let row_sel = selector("table#news-table tr")?;
    let cell_sel = selector("td")?;
    let link_sel = selector("a")?;

    let mut items = Vec::new();
    let mut current_date: Option<NaiveDate> = None;

    for row in document.select(&row_sel) {
        let cells: Vec<_> = row.select(&cell_sel).collect();
        if cells.len() < 2 {
            continue;
        }

        let stamp_text = cells[0].text().collect::<String>();
        let stamp_text = stamp_text.trim();

        let anchor = match cells[1].select(&link_sel).next() {
            Some(a) => a,
            None => continue,
        };
        let title = anchor.text().collect::<String>().trim().to_string();
        let link = anchor.value().attr("href").unwrap_or_default().to_string();
        if title.is_empty() || link.is_empty() {
            continue;
        }

        let date = match parse_news_stamp(stamp_text, current_date, today) {
            Some(dt) => dt,
            None => {
                debug!("Skipping news row with unparsable stamp {:?}", stamp_text);
                continue;
            }
        };
        current_date = Some(date.date());

        items.push(NewsItem { date, title, link });
    }

    Ok(items)
}

/// Build a table with the news-file schema from scraped items.
pub fn news_items_to_table(items: &[NewsItem]) -> Table {
    let mut table = Table::new(vec![
        "Date".to_string(),
        "Title".to_string(),
        "Link".to_string(),
    ]);
    for item in items {
        table.push_row(vec![
            item.date.format(NEWS_DATE_FORMAT).to_string(),
            item.title.clone(),
            item.link.clone(),
        ]);
    }
    table
}

fn selector(expr: &str) -> Result<Selector> {
    Selector::parse(expr).map_err(|e| anyhow!("Invalid selector {:?}: {}", expr, e))
}

/// Quote-page timestamps come as "Sep-06-25 08:30AM", "Today 08:30AM", or
/// a bare "08:30AM" continuing the previous row's date.
fn parse_news_stamp(
    text: &str,
    carried: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%b-%d-%y %I:%M%p") {
        return Some(dt);
    }

    if let Some(rest) = text.strip_prefix("Today ") {
        let time = parse_news_time(rest.trim())?;
        return Some(today.and_time(time));
    }

    let time = parse_news_time(text)?;
    Some(carried.unwrap_or(today).and_time(time))
}

fn parse_news_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%I:%M%p").ok()
}

/// Parse a raw CSV payload fetched from the provider export endpoint.
pub fn parse_export_csv(text: &str) -> Result<Table> {
    Table::from_csv_str(text).context("Provider export payload is not valid CSV")
}
