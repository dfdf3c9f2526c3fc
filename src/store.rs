//! File-backed table accumulation
//!
//! Each persisted file is a CSV log: header written once on first use,
//! data rows appended on every later capture. Appends align new rows to
//! the file's existing column order by name, so the on-disk schema is
//! fixed by whichever capture created the file.
//!
//! A non-empty file that fails to parse aborts the whole append before
//! any byte is written; the existing data is never touched in that case.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::table::Table;

/// Append a table to the CSV log at `path`.
///
/// A missing or zero-byte target gets the full table, header included.
/// Otherwise only data rows are appended, projected onto the existing
/// header by column name. New columns with no counterpart in the file
/// are dropped with a warning.
pub fn append_table(path: &Path, table: &Table) -> Result<()> {
    let fresh = !path.exists()
        || std::fs::metadata(path)
            .with_context(|| format!("Failed to stat {:?}", path))?
            .len()
            == 0;

    if fresh {
        let text = table.to_csv_string()?;
        std::fs::write(path, text).with_context(|| format!("Failed to write {:?}", path))?;
        info!("Created {:?} with {} rows", path, table.len());
        return Ok(());
    }

    let existing_text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

    // Validate the whole file before appending anything. A corrupt log
    // aborts the append and stays byte-for-byte unchanged.
    let existing = Table::from_csv_str(&existing_text).map_err(|e| {
        PipelineError::Store(format!("existing file {:?} is not valid CSV: {:#}", path, e))
    })?;

    for name in table.headers() {
        if !existing.headers().contains(name) {
            warn!(
                "Column {:?} not present in {:?}; its values will be dropped",
                name, path
            );
        }
    }

    let aligned = table.rows_aligned_to(existing.headers());

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {:?} for append", path))?;

    if !existing_text.ends_with('\n') {
        file.write_all(b"\n")
            .with_context(|| format!("Failed to pad {:?} before append", path))?;
    }

    let mut writer = csv::Writer::from_writer(file);
    for row in &aligned {
        writer.write_record(row)?;
    }
    writer.flush().context("Failed to flush appended rows")?;

    info!("Appended {} rows to {:?}", aligned.len(), path);
    Ok(())
}

/// Truncate every `*.csv` file in `dir` to zero bytes. Returns the paths
/// that were cleared.
pub fn clear_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        anyhow::bail!("Directory {:?} does not exist", dir);
    }

    let mut cleared = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to list {:?}", dir))? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to truncate {:?}", path))?;
        info!("Cleared {:?}", path);
        cleared.push(path);
    }
    Ok(cleared)
}
