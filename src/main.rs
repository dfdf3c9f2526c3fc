mod cli;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::time::Duration;
use tracing::info;

use cli::{Cli, Commands};
use newspulse::config::Config;
use newspulse::{analyze, export, fetch, news, plot, store};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Commands::Export {
            duration,
            interval,
            once,
        } => {
            if let Some(secs) = duration {
                config.export_duration_secs = secs;
            }
            if let Some(secs) = interval {
                config.export_interval_secs = secs;
            }
            handle_export(&config, once).await
        }

        Commands::News => handle_news(&config).await,

        Commands::Analyze => handle_analyze(&config, cli.json).await,

        Commands::Plot { dump } => handle_plot(&config, dump),

        Commands::Clear => handle_clear(&config),
    }
}

/// Run the price-export capture, either once or as the full loop.
async fn handle_export(config: &Config, once: bool) -> Result<()> {
    config.ensure_data_dir()?;
    let client = fetch::build_client(&config.user_agent)?;
    let output = config.export_path();

    if once {
        match export::export_once(&client, &config.export_url, &output).await {
            Ok(rows) => println!(
                "{} Exported {} rows to {}",
                "✓".green().bold(),
                rows,
                output.display()
            ),
            // A failed fetch is a skipped cycle, not a process failure
            Err(e) => println!("{} Export cycle skipped: {:#}", "!".yellow().bold(), e),
        }
        return Ok(());
    }

    info!(
        "Starting export loop: duration {}s, interval {}s",
        config.export_duration_secs, config.export_interval_secs
    );
    let cycles = export::run_export_loop(
        &client,
        &config.export_url,
        &output,
        Duration::from_secs(config.export_duration_secs),
        Duration::from_secs(config.export_interval_secs),
    )
    .await?;

    println!(
        "{} Export loop finished after {} cycles, data in {}",
        "✓".green().bold(),
        cycles,
        output.display()
    );
    Ok(())
}

/// Capture today's headlines for every configured ticker.
async fn handle_news(config: &Config) -> Result<()> {
    config.ensure_data_dir()?;
    let client = fetch::build_client(&config.user_agent)?;
    let captured = news::capture_today_news(&client, config).await?;

    for (ticker, count) in &captured {
        println!(
            "{} {}: {} headlines saved to {}",
            "✓".green().bold(),
            ticker,
            count,
            config.news_path(ticker).display()
        );
    }
    println!("All news articles have been saved.");
    Ok(())
}

/// Score every captured news file and print the batch report.
async fn handle_analyze(config: &Config, json: bool) -> Result<()> {
    if !config.data_dir.exists() {
        println!(
            "{} Data directory {} does not exist",
            "!".yellow().bold(),
            config.data_dir.display()
        );
        return Ok(());
    }

    let client = fetch::build_client(&config.user_agent)?;
    let reports = analyze::analyze_dir(&client, config).await?;
    cli::formatters::print_reports(&reports, json)
}

/// Chart sentiment against price, or dump the aligned series.
fn handle_plot(config: &Config, dump: bool) -> Result<()> {
    let charts = plot::load_chart_data(&config.data_dir)?;
    if dump {
        println!("{}", plot::view::dump_series(&charts));
        return Ok(());
    }
    plot::view::run_viewer(&charts)
}

/// Truncate every CSV file in the data directory.
fn handle_clear(config: &Config) -> Result<()> {
    match store::clear_csv_files(&config.data_dir) {
        Ok(cleared) => {
            for path in &cleared {
                println!("File {} has been cleared.", path.display());
            }
            println!("{} Cleared {} files", "✓".green().bold(), cleared.len());
        }
        Err(e) => println!("{} {:#}", "!".yellow().bold(), e),
    }
    Ok(())
}
