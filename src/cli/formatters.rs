//! Console rendering of analysis batch reports

use anyhow::Result;
use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use newspulse::analyze::{FileOutcome, FileReport, RowOutcome};

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Rows")]
    rows: String,
    #[tabled(rename = "Scored")]
    scored: String,
    #[tabled(rename = "Unavailable")]
    unavailable: String,
}

/// Print the per-file batch report, as a table or as JSON.
pub fn print_reports(reports: &[FileReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        println!("{} No news files found", "ℹ".blue().bold());
        return Ok(());
    }

    let rows: Vec<ReportRow> = reports.iter().map(report_row).collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);

    // Rows that were skipped deserve a line each, so nobody has to scan logs
    for report in reports {
        for row in &report.rows {
            match &row.outcome {
                RowOutcome::Scored { .. } => {}
                RowOutcome::ContentUnavailable => {
                    println!(
                        "  {} row {} ({}): content unavailable, sentiment left null",
                        "!".yellow().bold(),
                        row.row,
                        truncate(&row.title, 50)
                    );
                }
                RowOutcome::MissingField { field } => {
                    println!(
                        "  {} row {}: missing {} value, skipped",
                        "!".yellow().bold(),
                        row.row,
                        field
                    );
                }
            }
        }
    }

    let processed = reports
        .iter()
        .filter(|r| matches!(r.outcome, FileOutcome::Processed { .. }))
        .count();
    println!(
        "\n{} {} of {} files processed",
        "✓".green().bold(),
        processed,
        reports.len()
    );
    Ok(())
}

fn report_row(report: &FileReport) -> ReportRow {
    let file = report
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    match &report.outcome {
        FileOutcome::Processed {
            rows,
            scored,
            unavailable,
        } => ReportRow {
            file,
            outcome: "processed".green().to_string(),
            rows: rows.to_string(),
            scored: scored.to_string(),
            unavailable: unavailable.to_string(),
        },
        FileOutcome::SkippedEmpty => ReportRow {
            file,
            outcome: "skipped (empty)".yellow().to_string(),
            rows: "-".to_string(),
            scored: "-".to_string(),
            unavailable: "-".to_string(),
        },
        FileOutcome::SkippedMissingColumns { columns } => ReportRow {
            file,
            outcome: format!("skipped (missing {})", columns.join(", "))
                .yellow()
                .to_string(),
            rows: "-".to_string(),
            scored: "-".to_string(),
            unavailable: "-".to_string(),
        },
        FileOutcome::Failed { message } => ReportRow {
            file,
            outcome: format!("failed: {}", truncate(message, 60)).red().to_string(),
            rows: "-".to_string(),
            scored: "-".to_string(),
            unavailable: "-".to_string(),
        },
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}…", cut)
    }
}
