//! Row-oriented tables over CSV
//!
//! A `Table` is an ordered sequence of rows sharing one named column set,
//! holding one fetch's worth of data or a whole accumulated file. Cells are
//! kept as strings; provider payloads pass through untouched and numeric
//! interpretation happens only where a consumer needs it.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

use crate::error::PipelineError;

/// Timestamp format of the `Exported_At` column on price rows
/// (microsecond precision, matching the accumulated history files).
pub const EXPORTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Timestamp format of the `Date` column on news rows.
pub const NEWS_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An in-memory table: header names plus string-valued rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Parse CSV text, first line as header. Ragged or otherwise invalid
    /// records are an error, not a partial result.
    pub fn from_csv_str(text: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new().from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                PipelineError::Parse(format!("invalid CSV record at line {}: {}", idx + 2, e))
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!("Parsed table: {} columns, {} rows", headers.len(), rows.len());
        Ok(Self { headers, rows })
    }

    /// Parse a CSV file from disk.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        Self::from_csv_str(&text).with_context(|| format!("Failed to parse {:?}", path))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell value by row index and column name. Missing cells (short rows)
    /// read as `None`.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Names from `required` that this table lacks. Empty means all present.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    /// Append a row. Short rows are padded so every row matches the header
    /// width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Add a new column with one value per existing row. Values beyond the
    /// current row count are ignored; rows beyond the value count get an
    /// empty cell (read back as null).
    pub fn push_column(&mut self, name: &str, values: Vec<Option<String>>) {
        self.headers.push(name.to_string());
        for (idx, row) in self.rows.iter_mut().enumerate() {
            let value = values.get(idx).cloned().flatten().unwrap_or_default();
            row.push(value);
        }
    }

    /// Add a column where every row carries the same value, e.g. the
    /// capture timestamp of a fetch.
    pub fn stamp_column(&mut self, name: &str, value: &str) {
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(value.to_string());
        }
    }

    /// Serialize as CSV with a single header line.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if !self.headers.is_empty() {
            writer.write_record(&self.headers)?;
        }
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
        String::from_utf8(bytes).context("CSV output was not valid UTF-8")
    }

    /// Project the rows of this table onto another header's column order,
    /// matching columns by name. Columns absent here produce empty cells.
    pub fn rows_aligned_to(&self, target_headers: &[String]) -> Vec<Vec<String>> {
        let source_index: Vec<Option<usize>> = target_headers
            .iter()
            .map(|name| self.headers.iter().position(|h| h == name))
            .collect();

        self.rows
            .iter()
            .map(|row| {
                source_index
                    .iter()
                    .map(|idx| {
                        idx.and_then(|i| row.get(i))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }
}

/// Wall-clock capture timestamp in the price-file format.
pub fn capture_timestamp(now: DateTime<Local>) -> String {
    now.format(EXPORTED_AT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Ticker,Price\nAAPL,187.44\nAMZN,143.90\n";

    #[test]
    fn test_parse_first_line_is_header() {
        let table = Table::from_csv_str(SAMPLE).unwrap();
        assert_eq!(table.headers(), &["Ticker", "Price"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "Ticker"), Some("AAPL"));
        assert_eq!(table.get(1, "Price"), Some("143.90"));
    }

    #[test]
    fn test_ragged_record_is_a_parse_error() {
        let err = Table::from_csv_str("A,B\n1,2\n3\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_columns_reports_names() {
        let table = Table::from_csv_str("Date,Title\nx,y\n").unwrap();
        let missing = table.missing_columns(&["Link", "Title"]);
        assert_eq!(missing, vec!["Link".to_string()]);
        assert!(table.missing_columns(&["Date", "Title"]).is_empty());
    }

    #[test]
    fn test_stamp_column_applies_to_every_row() {
        let mut table = Table::from_csv_str(SAMPLE).unwrap();
        table.stamp_column("Exported_At", "2026-02-03 10:00:00.000001");
        assert_eq!(table.get(0, "Exported_At"), Some("2026-02-03 10:00:00.000001"));
        assert_eq!(table.get(1, "Exported_At"), Some("2026-02-03 10:00:00.000001"));
    }

    #[test]
    fn test_push_column_nulls_become_empty_cells() {
        let mut table = Table::from_csv_str("Title\na\nb\n").unwrap();
        table.push_column(
            "Title_Sentiment",
            vec![Some("0.5".to_string()), None],
        );
        assert_eq!(table.get(0, "Title_Sentiment"), Some("0.5"));
        assert_eq!(table.get(1, "Title_Sentiment"), Some(""));
    }

    #[test]
    fn test_round_trip_preserves_rows() {
        let table = Table::from_csv_str(SAMPLE).unwrap();
        let text = table.to_csv_string().unwrap();
        let again = Table::from_csv_str(&text).unwrap();
        assert_eq!(table, again);
    }

    #[test]
    fn test_alignment_by_name_fills_gaps() {
        let table = Table::from_csv_str("B,A\n2,1\n").unwrap();
        let target = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let rows = table.rows_aligned_to(&target);
        assert_eq!(rows, vec![vec!["1".to_string(), "2".to_string(), String::new()]]);
    }

    #[test]
    fn test_capture_timestamp_parses_back() {
        let stamp = capture_timestamp(Local::now());
        let parsed = chrono::NaiveDateTime::parse_from_str(&stamp, EXPORTED_AT_FORMAT);
        assert!(parsed.is_ok(), "stamp {:?} should parse", stamp);
    }
}
