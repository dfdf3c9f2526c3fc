//! Pipeline configuration
//!
//! All tunables that used to live as in-source constants in the research
//! scripts: data directory, ticker list, provider export URL, and the
//! export-loop timing. Loadable from a TOML file, with working defaults
//! so the binary runs without any configuration present.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Browser-like identity sent with article fetches. Several news hosts
/// refuse requests that identify as a non-browser client.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const DEFAULT_EXPORT_URL: &str =
    "https://elite.finviz.com/export.ashx?v=111&t=AMZN,AAPL,GOOGL&auth=REPLACE_ME";

const DEFAULT_QUOTE_PAGE_URL: &str = "https://finviz.com/quote.ashx?t=";

/// Pipeline configuration, shared by every subcommand.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding every CSV this tool reads or writes.
    pub data_dir: PathBuf,

    /// Tickers to capture news for.
    pub tickers: Vec<String>,

    /// Provider CSV export endpoint. The access token rides in the query
    /// string; there is no other authentication.
    pub export_url: String,

    /// Provider quote-page base URL; the ticker is appended when fetching
    /// the news table.
    pub quote_page_url: String,

    /// Total wall-clock run time of the export loop, in seconds.
    pub export_duration_secs: u64,

    /// Sleep between export cycles, in seconds. Zero means no sleeping,
    /// in which case the duration is taken as a plain cycle count.
    pub export_interval_secs: u64,

    /// Politeness delay between article fetches, in seconds.
    pub article_delay_secs: u64,

    /// User-Agent header for article fetches.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            tickers: vec!["AMZN".to_string(), "AAPL".to_string(), "GOOGL".to_string()],
            export_url: DEFAULT_EXPORT_URL.to_string(),
            quote_page_url: DEFAULT_QUOTE_PAGE_URL.to_string(),
            export_duration_secs: 6 * 60 * 60,
            export_interval_secs: 5 * 60,
            article_delay_secs: 1,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, or fall back to defaults when
    /// no path is given. A missing explicit path is an error; a missing
    /// default is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let text = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config file {:?}", p))?;
                let config: Config = toml::from_str(&text)
                    .with_context(|| format!("Failed to parse config file {:?}", p))?;
                debug!("Loaded config from {:?}", p);
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }

    /// Make sure the data directory exists.
    pub fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", self.data_dir))
    }

    /// Path of the accumulated price export file.
    pub fn export_path(&self) -> PathBuf {
        self.data_dir.join("export.csv")
    }

    /// Path of the raw news file for a ticker.
    pub fn news_path(&self, ticker: &str) -> PathBuf {
        self.data_dir.join(format!("{}_today_news.csv", ticker))
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("outputs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = Config::default();
        assert!(!config.tickers.is_empty());
        assert!(config.export_url.starts_with("https://"));
        assert!(config.quote_page_url.ends_with("?t="));
        assert_eq!(config.article_delay_secs, 1);
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newspulse.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/tmp/pulse-data"
tickers = ["MSFT"]
export_interval_secs = 60
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/pulse-data"));
        assert_eq!(config.tickers, vec!["MSFT".to_string()]);
        assert_eq!(config.export_interval_secs, 60);
        // Unset fields keep their defaults
        assert_eq!(config.article_delay_secs, 1);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/newspulse.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_file_paths_encode_ticker_and_suffix() {
        let config = Config {
            data_dir: PathBuf::from("/data"),
            ..Config::default()
        };
        assert_eq!(config.export_path(), PathBuf::from("/data/export.csv"));
        assert_eq!(
            config.news_path("AAPL"),
            PathBuf::from("/data/AAPL_today_news.csv")
        );
    }
}
