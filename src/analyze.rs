//! Sentiment pipeline over captured news files
//!
//! Walks the data directory for news CSVs, fetches each row's article,
//! scores title and content, and appends the three sentiment columns to a
//! `<stem>_with_sentiment.csv` companion file.
//!
//! Nothing here propagates an error past its own unit of work: a bad file
//! or row becomes a structured outcome in the batch report and the run
//! carries on. Unavailable articles produce null (empty) sentiment cells.

use indicatif::ProgressBar;
use reqwest::Client;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::fetch::fetch_article;
use crate::scrape::extract_paragraph_text;
use crate::sentiment::{score_article, ArticleSentiment};
use crate::store::append_table;
use crate::table::Table;

/// Suffix marking sentiment-augmented output files.
pub const SENTIMENT_SUFFIX: &str = "_with_sentiment";

/// What happened to one news row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RowOutcome {
    /// Title and content both scored; sentiment columns are populated.
    Scored { combined: f64 },
    /// Article could not be fetched or had no paragraph text; sentiment
    /// columns are null.
    ContentUnavailable,
    /// The row lacks a usable link or title value.
    MissingField { field: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RowRecord {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub title: String,
    pub outcome: RowOutcome,
}

/// What happened to one input file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FileOutcome {
    Processed {
        rows: usize,
        scored: usize,
        unavailable: usize,
    },
    SkippedEmpty,
    SkippedMissingColumns { columns: Vec<String> },
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub outcome: FileOutcome,
    pub rows: Vec<RowRecord>,
}

/// True for raw news CSVs: `.csv` files not already sentiment-augmented.
pub fn is_news_input(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".csv") && !name.ends_with(&format!("{}.csv", SENTIMENT_SUFFIX))
}

/// Output path for an input news file: `AAPL_news.csv` becomes
/// `AAPL_news_with_sentiment.csv` alongside it.
pub fn sentiment_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}.csv", stem, SENTIMENT_SUFFIX))
}

/// Analyze every news CSV in the configured data directory. Returns one
/// report per file visited; the process outcome is always success.
pub async fn analyze_dir(client: &Client, config: &Config) -> Result<Vec<FileReport>> {
    let mut inputs: Vec<PathBuf> = std::fs::read_dir(&config.data_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_news_input(path))
        .collect();
    inputs.sort();

    info!(
        "Analyzing {} news files in {:?}",
        inputs.len(),
        config.data_dir
    );

    let mut reports = Vec::new();
    for input in inputs {
        reports.push(analyze_file(client, config, &input).await);
    }
    Ok(reports)
}

/// Analyze one news file. Failures are folded into the report, never
/// returned.
pub async fn analyze_file(client: &Client, config: &Config, input: &Path) -> FileReport {
    info!("Processing file {:?}", input);

    let text = match std::fs::read_to_string(input) {
        Ok(t) => t,
        Err(e) => return failed(input, format!("read failed: {}", e)),
    };

    if text.trim().is_empty() {
        info!("Skipping empty file {:?}", input);
        return FileReport {
            input: input.to_path_buf(),
            output: None,
            outcome: FileOutcome::SkippedEmpty,
            rows: Vec::new(),
        };
    }

    let mut table = match Table::from_csv_str(&text) {
        Ok(t) => t,
        Err(e) => return failed(input, format!("parse failed: {:#}", e)),
    };

    let missing = table.missing_columns(&["Link", "Title"]);
    if !missing.is_empty() {
        warn!(
            "{}",
            PipelineError::MissingColumns {
                file: input.display().to_string(),
                columns: missing.clone(),
            }
        );
        return FileReport {
            input: input.to_path_buf(),
            output: None,
            outcome: FileOutcome::SkippedMissingColumns { columns: missing },
            rows: Vec::new(),
        };
    }

    let (records, sentiments) = score_rows(client, config, &table).await;

    let scored = records
        .iter()
        .filter(|r| matches!(r.outcome, RowOutcome::Scored { .. }))
        .count();
    let unavailable = records.len() - scored;

    table.push_column(
        "Title_Sentiment",
        sentiments.iter().map(|s| s.title.map(fmt_score)).collect(),
    );
    table.push_column(
        "Content_Sentiment",
        sentiments.iter().map(|s| s.content.map(fmt_score)).collect(),
    );
    table.push_column(
        "Combined_Sentiment",
        sentiments
            .iter()
            .map(|s| s.combined.map(fmt_score))
            .collect(),
    );

    let output = sentiment_output_path(input);
    if let Err(e) = append_table(&output, &table) {
        warn!("Could not append results for {:?}: {:#}", input, e);
        return failed(input, format!("append failed: {:#}", e));
    }

    FileReport {
        input: input.to_path_buf(),
        output: Some(output),
        outcome: FileOutcome::Processed {
            rows: records.len(),
            scored,
            unavailable,
        },
        rows: records,
    }
}

/// Fetch and score every row of a news table, with the configured
/// politeness delay between article fetches.
async fn score_rows(
    client: &Client,
    config: &Config,
    table: &Table,
) -> (Vec<RowRecord>, Vec<ArticleSentiment>) {
    let mut records = Vec::with_capacity(table.len());
    let mut sentiments = Vec::with_capacity(table.len());
    let progress = ProgressBar::new(table.len() as u64);

    for idx in 0..table.len() {
        let link = table.get(idx, "Link").unwrap_or_default().trim().to_string();
        let title = table.get(idx, "Title").unwrap_or_default().trim().to_string();

        let (outcome, sentiment) = if link.is_empty() || title.is_empty() {
            let field = if link.is_empty() { "Link" } else { "Title" };
            warn!("Row {}: missing {} value", idx + 1, field);
            (
                RowOutcome::MissingField {
                    field: field.to_string(),
                },
                ArticleSentiment::unavailable(),
            )
        } else {
            let content = match fetch_article(client, &link).await {
                Some(html) => extract_paragraph_text(&html),
                None => String::new(),
            };
            let sentiment = score_article(&title, &content);
            let outcome = match sentiment.combined {
                Some(combined) => RowOutcome::Scored { combined },
                None => RowOutcome::ContentUnavailable,
            };
            (outcome, sentiment)
        };

        records.push(RowRecord {
            row: idx + 1,
            title,
            outcome,
        });
        sentiments.push(sentiment);
        progress.inc(1);

        if config.article_delay_secs > 0 && idx + 1 < table.len() {
            sleep(Duration::from_secs(config.article_delay_secs)).await;
        }
    }

    progress.finish_and_clear();
    (records, sentiments)
}

fn fmt_score(score: f64) -> String {
    format!("{}", score)
}

fn failed(input: &Path, message: String) -> FileReport {
    FileReport {
        input: input.to_path_buf(),
        output: None,
        outcome: FileOutcome::Failed { message },
        rows: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_filter_skips_augmented_files() {
        assert!(is_news_input(Path::new("/d/AAPL_today_news.csv")));
        assert!(!is_news_input(Path::new(
            "/d/AAPL_today_news_with_sentiment.csv"
        )));
        assert!(!is_news_input(Path::new("/d/notes.txt")));
    }

    #[test]
    fn test_output_path_inserts_suffix() {
        assert_eq!(
            sentiment_output_path(Path::new("/d/AAPL_news.csv")),
            PathBuf::from("/d/AAPL_news_with_sentiment.csv")
        );
    }

    #[tokio::test]
    async fn test_empty_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("AAPL_news.csv");
        std::fs::write(&input, "").unwrap();

        let config = Config {
            data_dir: dir.path().to_path_buf(),
            article_delay_secs: 0,
            ..Config::default()
        };
        let client = crate::fetch::build_client("test-agent").unwrap();
        let report = analyze_file(&client, &config, &input).await;
        assert!(matches!(report.outcome, FileOutcome::SkippedEmpty));
        assert!(!sentiment_output_path(&input).exists());
    }

    #[tokio::test]
    async fn test_missing_columns_skip_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("AAPL_news.csv");
        std::fs::write(&input, "Date,Headline\n2026-01-01 09:00:00,hello\n").unwrap();

        let config = Config {
            data_dir: dir.path().to_path_buf(),
            article_delay_secs: 0,
            ..Config::default()
        };
        let client = crate::fetch::build_client("test-agent").unwrap();
        let report = analyze_file(&client, &config, &input).await;
        match report.outcome {
            FileOutcome::SkippedMissingColumns { columns } => {
                assert_eq!(columns, vec!["Link".to_string(), "Title".to_string()]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
