//! Newspulse - stock news and price capture with sentiment scoring
//!
//! This library provides the pieces of the capture pipeline: periodic
//! price-export accumulation, per-ticker headline scraping, lexicon
//! sentiment scoring over titles and article bodies, and intraday
//! sentiment/price chart data. All state is plain CSV files in one
//! data directory.

pub mod analyze;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod news;
pub mod plot;
pub mod scrape;
pub mod sentiment;
pub mod store;
pub mod table;
