//! End-to-end tests of the command-line binary

mod common;

use common::*;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rest_with_gps"))
        .args(args)
        .env_remove("LOG_LEVEL")
        .output()
        .expect("Failed to run rest_with_gps")
}

fn write_ride(dir: &Path, name: &str) -> String {
    let path = dir.join(name);
    let fixes = ride_with_one_stop();
    if name.ends_with(".fit") {
        fs::write(&path, ride_as_fit(&fixes)).expect("Failed to write fixture");
    } else {
        fs::write(&path, ride_as_strava_json(&fixes)).expect("Failed to write fixture");
    }
    path.to_str().unwrap().to_string()
}

#[test]
fn test_cli_writes_map_next_to_input() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_ride(temp_dir.path(), "ride.fit");

    let output = run_cli(&[&input]);
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Done"));

    let html = fs::read_to_string(temp_dir.path().join("ride.fit.html"))
        .expect("HTML map should be written");
    assert_eq!(html.matches("L.marker(").count(), 1);
    assert!(!temp_dir.path().join("ride.fit.stops.csv").exists());
}

#[test]
fn test_cli_min_stop_filters_markers() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_ride(temp_dir.path(), "streams.json");

    let output = run_cli(&["-s", "15", &input]);
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let html = fs::read_to_string(temp_dir.path().join("streams.json.html"))
        .expect("HTML map should be written");
    assert_eq!(html.matches("L.marker(").count(), 0);
    assert!(html.contains("L.polyline("));
}

#[test]
fn test_cli_optional_exports_and_output_dir() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_ride(temp_dir.path(), "streams.json");
    let output_dir = temp_dir.path().join("out");

    let output = run_cli(&[
        "--csv",
        "--gpx",
        "--json",
        "--utc-offset",
        "-300",
        "--output-dir",
        output_dir.to_str().unwrap(),
        &input,
    ]);
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    for name in [
        "streams.json.html",
        "streams.json.stops.csv",
        "streams.json.route.gpx",
        "streams.json.summary.json",
    ] {
        assert!(output_dir.join(name).exists(), "{} should exist", name);
    }

    let csv = fs::read_to_string(output_dir.join("streams.json.stops.csv"))
        .expect("Failed to read CSV");
    assert!(csv.contains("2023-08-20T15:32:10-05:00"));
}

#[test]
fn test_cli_log_level_option() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_ride(temp_dir.path(), "ride.fit");

    let output = run_cli(&["--log", "debug", &input]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[DEBUG]"), "stderr was: {}", stderr);

    let output = run_cli(&["--log", "error", &input]);
    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).contains("[INFO ]"));
}

#[test]
fn test_cli_reports_missing_and_unsupported_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let missing = temp_dir.path().join("missing.fit");
    let output = run_cli(&[missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.fit"));

    let gpx = temp_dir.path().join("ride.gpx");
    fs::write(&gpx, "<gpx/>").expect("Failed to write fixture");
    let output = run_cli(&[gpx.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Done"));
}

#[test]
fn test_cli_rejects_negative_min_stop() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_ride(temp_dir.path(), "ride.fit");

    let output = run_cli(&["-s", "-1", &input]);
    assert!(!output.status.success());
    assert!(!temp_dir.path().join("ride.fit.html").exists());
}

#[cfg(unix)]
#[test]
fn test_cli_termination_signal_exits_15() {
    use std::process::Stdio;
    use std::thread;
    use std::time::Duration;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    // Reading a FIFO with no writer blocks, keeping the CLI alive until signalled
    let fifo = temp_dir.path().join("pending.fit");
    let status = Command::new("mkfifo")
        .arg(&fifo)
        .status()
        .expect("Failed to run mkfifo");
    assert!(status.success());

    let child = Command::new(env!("CARGO_BIN_EXE_rest_with_gps"))
        .arg(&fifo)
        .env_remove("LOG_LEVEL")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start rest_with_gps");

    thread::sleep(Duration::from_millis(1000));
    let status = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .expect("Failed to run kill");
    assert!(status.success());

    let output = child
        .wait_with_output()
        .expect("Failed to wait for rest_with_gps");
    assert_eq!(output.status.code(), Some(15));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Terminated."));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Done"));
}
