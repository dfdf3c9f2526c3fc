//! Periodic price-export capture
//!
//! One cycle fetches the provider's CSV export, stamps every row with the
//! wall-clock capture time, and appends the result to the accumulated
//! `export.csv` log. The loop repeats cycles strictly sequentially on a
//! fixed interval until the configured duration has elapsed; a failed
//! fetch logs and skips that cycle without stopping the loop.

use anyhow::Result;
use chrono::Local;
use reqwest::Client;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::scrape::parse_export_csv;
use crate::store::append_table;
use crate::table::capture_timestamp;

/// Perform one fetch-append cycle. Returns the number of rows appended.
pub async fn export_once(client: &Client, url: &str, output_path: &Path) -> Result<usize> {
    let body = crate::fetch::fetch_export_csv(client, url).await?;
    let mut table = parse_export_csv(&body)?;
    table.stamp_column("Exported_At", &capture_timestamp(Local::now()));
    append_table(output_path, &table)?;
    info!("Exported {} rows to {:?}", table.len(), output_path);
    Ok(table.len())
}

/// Run fetch-append cycles until `duration` has elapsed, sleeping
/// `interval` between cycles. Cycles never overlap. Returns the number
/// of cycles performed, counting failed fetches that were skipped.
///
/// A zero interval never advances the wall clock between ticks, so in
/// that case `duration` is taken as a plain cycle count in seconds
/// (test mode: duration of N seconds runs exactly N cycles).
pub async fn run_export_loop(
    client: &Client,
    url: &str,
    output_path: &Path,
    duration: Duration,
    interval: Duration,
) -> Result<u64> {
    let mut cycles = 0u64;

    if interval.is_zero() {
        for _ in 0..duration.as_secs() {
            run_cycle(client, url, output_path, &mut cycles).await;
        }
        info!("Export loop done after {} cycles", cycles);
        return Ok(cycles);
    }

    let start = Instant::now();
    while start.elapsed() < duration {
        run_cycle(client, url, output_path, &mut cycles).await;
        sleep(interval).await;
    }

    info!("Export loop done after {} cycles", cycles);
    Ok(cycles)
}

async fn run_cycle(client: &Client, url: &str, output_path: &Path, cycles: &mut u64) {
    if let Err(e) = export_once(client, url, output_path).await {
        warn!("Export cycle failed, skipping: {:#}", e);
    }
    *cycles += 1;
}
