//! Tests for CLI argument parsing and the binary end to end

use assert_cmd::Command;
use clap::Parser;
use exoscope::cli::Cli;
use exoscope::report::OutputMode;
use predicates::prelude::*;
use std::path::PathBuf;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_cli_default_values() {
    let cli = Cli::try_parse_from(["exoscope"]).unwrap();

    assert_eq!(cli.dataset, "pscomppars", "Default dataset should be pscomppars");
    assert_eq!(cli.head, 5, "Default sample size should be 5 rows");
    assert_eq!(cli.project_path, PathBuf::from("."));
    assert_eq!(cli.output_mode, OutputMode::Plain);
    assert!(cli.plots_dir.is_none());
    assert!(cli.report.is_none());
    assert!(!cli.refresh);
    assert!(!cli.quiet);
    assert_eq!(cli.timeout, 300);
    assert_eq!(cli.infer_schema_length, 10000);
}

#[test]
fn test_cli_cache_file_derivation() {
    let cli = Cli::parse_from(["exoscope", "-p", "/work/exo", "-d", "ps"]);
    assert_eq!(cli.cache_file(), PathBuf::from("/work/exo/datasets/ps.csv"));
}

#[test]
fn test_cli_reduce_options() {
    let cli = Cli::parse_from([
        "exoscope",
        "--output-mode",
        "rich",
        "--plots-dir",
        "charts",
    ]);

    let options = cli.reduce_options();
    assert!(options.verbose);
    assert_eq!(options.output_mode, OutputMode::Rich);
    assert_eq!(options.plots.unwrap().dir, PathBuf::from("charts"));

    let quiet = Cli::parse_from(["exoscope", "--quiet"]).reduce_options();
    assert!(!quiet.verbose);
}

#[test]
fn test_cli_archive_config() {
    let cli = Cli::parse_from([
        "exoscope",
        "--archive-url",
        "http://localhost:9000",
        "--timeout",
        "12",
        "--infer-schema-length",
        "0",
    ]);

    let config = cli.archive_config();
    assert_eq!(config.base_url, "http://localhost:9000");
    assert_eq!(config.timeout.as_secs(), 12);
    assert_eq!(config.infer_schema_length, None);
}

#[test]
fn test_cli_rejects_zero_timeout() {
    let result = Cli::try_parse_from(["exoscope", "--timeout", "0"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_rejects_unknown_output_mode() {
    let result = Cli::try_parse_from(["exoscope", "--output-mode", "html"]);
    assert!(result.is_err());
}

#[test]
fn test_binary_profiles_cached_dataset() {
    let mut df = create_planet_dataframe();
    let (temp_dir, _) = create_cached_project(&mut df, "pscomppars");

    Command::cargo_bin("exoscope")
        .unwrap()
        .args(["--project-path", temp_dir.path().to_str().unwrap(), "--head", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First 2 rows of the pscomppars dataset"))
        .stdout(predicate::str::contains("Columns Statistics Summary"))
        .stdout(predicate::str::contains("Feature Counts Summary"))
        .stdout(predicate::str::contains("Setting pl_name as index"))
        .stdout(predicate::str::contains("Final dataset shape: (6, 2)"));
}

#[test]
fn test_binary_writes_charts_and_report() {
    let mut df = create_planet_dataframe();
    let (temp_dir, _) = create_cached_project(&mut df, "pscomppars");
    let charts = temp_dir.path().join("charts");
    let report = temp_dir.path().join("profile.json");

    Command::cargo_bin("exoscope")
        .unwrap()
        .args([
            "--project-path",
            temp_dir.path().to_str().unwrap(),
            "--plots-dir",
            charts.to_str().unwrap(),
            "--report",
            report.to_str().unwrap(),
        ])
        .assert()
        .success();

    for chart in [
        "null_percentage_per_column.svg",
        "nulls_per_row.svg",
        "unique_values_per_column.svg",
    ] {
        assert!(charts.join(chart).exists(), "missing chart {}", chart);
    }

    let null_chart = std::fs::read_to_string(charts.join("null_percentage_per_column.svg")).unwrap();
    assert!(null_chart.contains("<svg"));
    assert!(
        ["pl_orbper", "sy_snum"].iter().any(|name| null_chart.contains(name)),
        "null percentage chart should label its bars with column names"
    );

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["metadata"]["dataset"], "pscomppars");
    assert_eq!(json["summary"]["promoted_index"], "pl_name");
    assert_eq!(json["feature_counts"]["total"]["total"], 2);
}

#[test]
fn test_binary_fails_when_archive_unreachable() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    Command::cargo_bin("exoscope")
        .unwrap()
        .args([
            "--project-path",
            temp_dir.path().to_str().unwrap(),
            "--archive-url",
            "http://127.0.0.1:9",
            "--timeout",
            "5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch dataset 'pscomppars'"));

    assert!(!temp_dir.path().join("datasets").join("pscomppars.csv").exists());
}
