use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::tempdir;

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("thermodecay");
    cmd.env("RUST_LOG", "error").env("NO_COLOR", "1");
    cmd
}

#[test]
fn default_run_prints_tuple_and_writes_chart() {
    let temp_dir = tempdir().expect("create temp dir");

    cli()
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(contains("(1.1985365853658537e-11, 0.09999999999999999, 300.0)"))
        .stdout(contains("Chart written to temperature_decay.svg"))
        .stdout(contains("Solver [Full]"))
        .stdout(contains("Solver [Fourier]"));

    let chart = fs::read_to_string(temp_dir.path().join("temperature_decay.svg"))
        .expect("default chart written");
    assert!(chart.contains("Temperature Decay"));
    assert!(chart.contains("Time (s)"));
    assert!(chart.contains("Temperature (K)"));
}

#[test]
fn simulate_writes_chart_to_requested_path() {
    let temp_dir = tempdir().expect("create temp dir");
    let chart = temp_dir.path().join("nested.svg");

    cli()
        .arg("simulate")
        .arg("--plot")
        .arg(&chart)
        .assert()
        .success()
        .stdout(contains("Largest gap:"));

    assert!(chart.exists());
}

#[test]
fn no_plot_skips_the_chart() {
    let temp_dir = tempdir().expect("create temp dir");

    cli()
        .current_dir(temp_dir.path())
        .args(["simulate", "--no-plot"])
        .assert()
        .success()
        .stdout(contains("0.09999999999999999, 300.0)"))
        .stdout(contains("Chart written").not());

    assert!(!temp_dir.path().join("temperature_decay.svg").exists());
}

#[test]
fn plot_and_no_plot_conflict() {
    cli()
        .args(["simulate", "--no-plot", "--plot", "x.svg"])
        .assert()
        .failure();
}

#[test]
fn table_lists_every_sample() {
    let output = cli()
        .args(["simulate", "--no-plot", "--table", "--samples", "5"])
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let header = stdout
        .lines()
        .position(|line| line.contains("Time (s)"))
        .expect("table header present");
    let rows: Vec<_> = stdout.lines().skip(header + 1).collect();
    assert_eq!(rows.len(), 5);
    assert!(rows[0].contains("1000.0000"));
    assert!(rows[4].trim_start().starts_with("50.000"));
}

#[test]
fn csv_output_is_machine_readable() {
    let output = cli()
        .args(["simulate", "--no-plot", "--format", "csv"])
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines[0], "time_s,full_k,fourier_k");
    assert_eq!(lines.len(), 101);
    assert!(lines[1].starts_with("0.0,1000.0,1000.0"));
}

#[test]
fn json_output_parses() {
    let output = cli()
        .args(["simulate", "--no-plot", "--format", "json", "--samples", "20"])
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["times"].as_array().map(Vec::len), Some(20));
    assert_eq!(value["coefficients"]["t0"], 300.0);
    assert_eq!(value["full"]["model"], "full");
}

#[test]
fn text_output_respects_no_color_flag() {
    cargo_bin_cmd!("thermodecay")
        .env("RUST_LOG", "error")
        .env_remove("NO_COLOR")
        .env("TERM", "xterm-256color")
        .args(["--no-color", "coefficients"])
        .assert()
        .success()
        .stdout(contains("\x1b[").not());
}

#[test]
fn coefficients_command_prints_tuple() {
    cli()
        .arg("coefficients")
        .assert()
        .success()
        .stdout(contains("(1.1985365853658537e-11, 0.09999999999999999, 300.0)"))
        .stdout(contains("Thermal conductance:"));
}

#[test]
fn coefficients_command_reads_constants_file() {
    let temp_dir = tempdir().expect("create temp dir");
    let constants = temp_dir.path().join("constants.json");
    fs::write(&constants, r#"{ "ambient_temperature": 250.0 }"#).expect("write constants");

    let output = cli()
        .args(["coefficients", "--format", "json", "--constants"])
        .arg(&constants)
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["t0"], 250.0);
    assert_eq!(value["constants"]["ambient_temperature"], 250.0);
}

#[test]
fn coefficients_command_rejects_csv() {
    cli()
        .args(["coefficients", "--format", "csv"])
        .assert()
        .failure()
        .stderr(contains("text or json"));
}

#[test]
fn invalid_constants_file_fails_with_context() {
    let temp_dir = tempdir().expect("create temp dir");
    let constants = temp_dir.path().join("constants.json");
    fs::write(&constants, r#"{ "support_length": 0.0 }"#).expect("write constants");

    cli()
        .args(["simulate", "--no-plot", "--constants"])
        .arg(&constants)
        .assert()
        .failure()
        .stderr(contains("failed to load physical constants"))
        .stderr(contains("invalid support_length"));
}

#[test]
fn single_sample_is_rejected() {
    cli()
        .args(["simulate", "--no-plot", "--samples", "1"])
        .assert()
        .failure()
        .stderr(contains("invalid time grid"));
}

#[test]
fn unknown_format_is_a_usage_error() {
    cli()
        .args(["simulate", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(contains("unknown report format"));
}

#[test]
fn logs_go_to_stderr() {
    cargo_bin_cmd!("thermodecay")
        .env("RUST_LOG", "info")
        .env("NO_COLOR", "1")
        .args(["simulate", "--no-plot", "--format", "csv", "--samples", "3"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("time_s,full_k,fourier_k"))
        .stderr(contains("derived coefficients"));
}
