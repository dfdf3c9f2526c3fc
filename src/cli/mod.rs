use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;

#[derive(Parser)]
#[command(name = "newspulse")]
#[command(
    version,
    about = "Stock news and price capture with sentiment scoring and intraday charts"
)]
#[command(
    long_about = "Capture a provider's stock price export on a schedule, scrape per-ticker \
news headlines, score them with a financial sentiment lexicon, and chart sentiment against \
price over the trading day. All state lives in plain CSV files in one data directory."
)]
pub struct Cli {
    /// Path to a TOML config file (defaults apply when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured data directory
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the periodic price-export capture loop
    Export {
        /// Total run time in seconds (overrides config)
        #[arg(long)]
        duration: Option<u64>,

        /// Sleep between cycles in seconds (overrides config)
        #[arg(long)]
        interval: Option<u64>,

        /// Perform a single fetch-append cycle and exit
        #[arg(long)]
        once: bool,
    },

    /// Capture today's headlines for the configured tickers
    News,

    /// Score captured news files and write sentiment-augmented copies
    Analyze,

    /// Chart sentiment against price, aligned by time of day
    Plot {
        /// Print the aligned series as a table instead of opening the viewer
        #[arg(long)]
        dump: bool,
    },

    /// Truncate every CSV file in the data directory
    Clear,
}
