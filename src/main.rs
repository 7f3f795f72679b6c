//! CLI binary for Rest with GPS
//!
//! Analyzes one activity file and writes a map of its stops next to it.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, Command};
use log::info;
use rest_with_gps::{
    analyze_source, export_all, open_point_source, AnalysisConfig, ExportOptions, SourceOptions,
    DEFAULT_DISPLAY_OFFSET_MINUTES, DEFAULT_MIN_STOP_MINUTES,
};
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

/// Exit code used when terminated by a signal
const TERMINATED_EXIT_CODE: i32 = 15;

fn version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION
        .get_or_init(|| match option_env!("VERGEN_GIT_SHA") {
            Some(sha) if !sha.is_empty() && sha != "VERGEN_IDEMPOTENT_OUTPUT" => {
                format!("{} ({})", env!("CARGO_PKG_VERSION"), sha)
            }
            _ => env!("CARGO_PKG_VERSION").to_string(),
        })
        .as_str()
}

fn build_command() -> Command {
    Command::new("Rest with GPS")
        .version(version())
        .about("Find where you stopped on a GPS track. Writes an HTML map of the route and stops.")
        .after_help("SIGTERM and Ctrl-C both stop the run with \"Terminated.\" and exit code 15.")
        .arg(
            Arg::new("filepath")
                .help("FIT activity file or Strava JSON stream export (.fit, .json)")
                .required(true)
                .value_name("FILEPATH")
                .index(1),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .help("Log level: error, warn, info, debug or trace (default: $LOG_LEVEL or info)")
                .value_name("LOG_LEVEL"),
        )
        .arg(
            Arg::new("min-stop")
                .short('s')
                .help("Shortest stop to show on the map, in minutes")
                .value_name("STOP_MINUTES")
                .value_parser(value_parser!(i64))
                .default_value("5"),
        )
        .arg(
            Arg::new("utc-offset")
                .long("utc-offset")
                .help("Offset from UTC used to display stop times, in minutes")
                .value_name("MINUTES")
                .allow_hyphen_values(true)
                .value_parser(value_parser!(i32))
                .default_value("120"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for output files (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Also export significant stops to a CSV file")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("gpx")
                .long("gpx")
                .help("Also export the simplified route and stops to a GPX file")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Also export all stops and the route to a JSON file")
                .action(clap::ArgAction::SetTrue),
        )
}

fn init_logging(level: &str) {
    env_logger::Builder::new()
        .parse_filters(level)
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();
}

fn main() -> Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("Terminated.");
        std::process::exit(TERMINATED_EXIT_CODE);
    })
    .context("Failed to install termination handler")?;

    let matches = build_command().get_matches();

    let log_level = matches
        .get_one::<String>("log")
        .cloned()
        .or_else(|| std::env::var("LOG_LEVEL").ok())
        .unwrap_or_else(|| "info".to_string());
    init_logging(&log_level);

    let filepath = matches
        .get_one::<String>("filepath")
        .context("Missing input file")?;
    let min_stop = matches
        .get_one::<i64>("min-stop")
        .copied()
        .unwrap_or(DEFAULT_MIN_STOP_MINUTES);
    let utc_offset = matches
        .get_one::<i32>("utc-offset")
        .copied()
        .unwrap_or(DEFAULT_DISPLAY_OFFSET_MINUTES);

    let config = AnalysisConfig::default()
        .with_min_stop_minutes(min_stop)?
        .with_display_offset_minutes(utc_offset)?;

    let export_options = ExportOptions {
        html: true,
        csv: matches.get_flag("csv"),
        gpx: matches.get_flag("gpx"),
        json: matches.get_flag("json"),
        output_dir: matches.get_one::<String>("output-dir").cloned(),
    };

    let path = Path::new(filepath);
    info!("Processing: {}", path.display());

    let source = open_point_source(path, &SourceOptions::default())
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let summary = analyze_source(source, &config)
        .with_context(|| format!("Failed to read track from {}", path.display()))?;
    export_all(&summary, path, &export_options, &config)
        .with_context(|| format!("Failed to export results for {}", path.display()))?;

    println!("Done");
    Ok(())
}
