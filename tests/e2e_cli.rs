use assert_cmd::{cargo, prelude::*};
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn setup_data_dir() -> TempDir {
    TempDir::new().expect("failed to create temp data dir")
}

#[test]
fn clear_truncates_csv_files_and_exits_zero() {
    let dir = setup_data_dir();
    let csv_path = dir.path().join("AAPL_today_news.csv");
    std::fs::write(&csv_path, "Link,Title\nhttps://n/1,Up\n").unwrap();

    let mut cmd = Command::new(cargo::cargo_bin!("newspulse"));
    cmd.arg("--no-color")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("clear");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("has been cleared"))
        .stdout(predicate::str::contains("\u{001b}[").not());

    assert_eq!(std::fs::metadata(&csv_path).unwrap().len(), 0);
}

#[test]
fn clear_missing_directory_reports_and_exits_zero() {
    let dir = setup_data_dir();
    let missing = dir.path().join("nope");

    let mut cmd = Command::new(cargo::cargo_bin!("newspulse"));
    cmd.arg("--no-color").arg("--data-dir").arg(&missing).arg("clear");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("does not exist"));
}

#[test]
fn analyze_empty_directory_reports_no_files() {
    let dir = setup_data_dir();

    let mut cmd = Command::new(cargo::cargo_bin!("newspulse"));
    cmd.arg("--no-color")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("analyze");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No news files found"));
}

#[test]
fn analyze_missing_columns_skips_file_with_message() {
    let dir = setup_data_dir();
    std::fs::write(
        dir.path().join("AAPL_news.csv"),
        "Date,Headline\n2026-02-03 09:00:00,hello\n",
    )
    .unwrap();

    let mut cmd = Command::new(cargo::cargo_bin!("newspulse"));
    cmd.arg("--no-color")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("analyze");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("missing Link, Title"));

    assert!(
        !dir.path().join("AAPL_news_with_sentiment.csv").exists(),
        "skipped file must produce no output"
    );
}

#[test]
fn export_once_with_unreachable_provider_exits_zero() {
    let dir = setup_data_dir();
    let config_path = dir.path().join("newspulse.toml");
    std::fs::write(
        &config_path,
        format!(
            "data_dir = {:?}\nexport_url = \"http://127.0.0.1:1/export.ashx\"\n",
            dir.path()
        ),
    )
    .unwrap();

    let mut cmd = Command::new(cargo::cargo_bin!("newspulse"));
    cmd.arg("--no-color")
        .arg("--config")
        .arg(&config_path)
        .arg("export")
        .arg("--once");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("skipped"));

    assert!(!dir.path().join("export.csv").exists());
}

#[test]
fn plot_dump_prints_aligned_series() {
    let dir = setup_data_dir();
    std::fs::write(
        dir.path().join("AAPL_today_news_with_sentiment.csv"),
        "Date,Title,Link,Title_Sentiment,Content_Sentiment,Combined_Sentiment\n\
         2026-02-03 09:30:00,Up,https://n/1,0.5,0.3,0.4\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("export.csv"),
        "Ticker,Price,Exported_At\nAAPL,187.44,2026-02-03 09:31:00.000001\n",
    )
    .unwrap();

    let mut cmd = Command::new(cargo::cargo_bin!("newspulse"));
    cmd.arg("--no-color")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("plot")
        .arg("--dump");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("AAPL"))
        .stdout(predicate::str::contains("sentiment"))
        .stdout(predicate::str::contains("09:31:00"));
}

#[test]
fn plot_dump_with_no_data_is_friendly() {
    let dir = setup_data_dir();

    let mut cmd = Command::new(cargo::cargo_bin!("newspulse"));
    cmd.arg("--no-color")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("plot")
        .arg("--dump");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No aligned rows"));
}
