//! Export functionality for track summaries
//!
//! Contains functions for writing an analyzed track to an HTML map page, a CSV
//! list of stops, a GPX route and a JSON summary.

use crate::config::AnalysisConfig;
use crate::error::{Result, TrackError};
use crate::types::{StopInterval, TrackSummary};
use chrono::Duration;
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const ROUTE_COLOR: &str = "#e4007f";
const STOP_COLOR: &str = "#00aa00";
const LEAFLET_VERSION: &str = "1.9.4";

/// Export options for controlling output formats
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub html: bool,
    pub csv: bool,
    pub gpx: bool,
    pub json: bool,
    pub output_dir: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            html: true,
            csv: false,
            gpx: false,
            json: false,
            output_dir: None,
        }
    }
}

/// Files written by [`export_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub html_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
    pub gpx_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

/// Output file locations for one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub html: PathBuf,
    pub csv: PathBuf,
    pub gpx: PathBuf,
    pub json: PathBuf,
}

/// Compute where exports of `input_path` go
///
/// Outputs are named after the full input file name (`ride.fit` gives
/// `ride.fit.html`) and placed in the output directory, or next to the input.
pub fn compute_export_paths(input_path: &Path, export_options: &ExportOptions) -> ExportPaths {
    let file_name = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("track");

    let output_dir = match &export_options.output_dir {
        Some(dir) => PathBuf::from(dir),
        None => input_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    ExportPaths {
        html: output_dir.join(format!("{}.html", file_name)),
        csv: output_dir.join(format!("{}.stops.csv", file_name)),
        gpx: output_dir.join(format!("{}.route.gpx", file_name)),
        json: output_dir.join(format!("{}.summary.json", file_name)),
    }
}

fn create_output_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Quote a string as a JavaScript string literal that is safe inside `<script>`
fn js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Popup text for a stop marker
pub fn stop_popup(stop: &StopInterval) -> String {
    format!(
        "{}\n{} <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">googlemap</a>",
        stop.time_range_label(),
        stop.elapsed_label(),
        stop.maps_url()
    )
}

/// Render the HTML map page for a summary
pub fn render_html(summary: &TrackSummary, title: &str, min_stop: Duration) -> Result<String> {
    let (bounds, center) = match (summary.bounds(), summary.center()) {
        (Some(bounds), Some(center)) => (bounds, center),
        _ => return Err(TrackError::Export("route is empty, nothing to draw".to_string())),
    };

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("<title>{}</title>\n", xml_escape(title)));
    html.push_str(&format!(
        "<link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@{0}/dist/leaflet.css\">\n\
         <script src=\"https://unpkg.com/leaflet@{0}/dist/leaflet.js\"></script>\n",
        LEAFLET_VERSION
    ));
    html.push_str("<style>html, body, #map { height: 100%; margin: 0; }</style>\n");
    html.push_str("</head>\n<body>\n<div id=\"map\"></div>\n<script>\n");
    html.push_str(&format!(
        "var map = L.map(\"map\").setView([{}, {}], 13);\n",
        center.latitude, center.longitude
    ));
    html.push_str(
        "L.tileLayer(\"https://tile.openstreetmap.org/{z}/{x}/{y}.png\", \
         {attribution: \"&copy; OpenStreetMap contributors\"}).addTo(map);\n",
    );
    html.push_str(&format!(
        "map.fitBounds([[{}, {}], [{}, {}]]);\n",
        bounds.min_lat, bounds.min_lng, bounds.max_lat, bounds.max_lng
    ));

    let vertices: Vec<String> = summary
        .route
        .iter()
        .map(|p| format!("[{}, {}]", p.latitude, p.longitude))
        .collect();
    html.push_str(&format!(
        "L.polyline([{}], {{color: \"{}\"}}).addTo(map);\n",
        vertices.join(", "),
        ROUTE_COLOR
    ));

    for stop in summary.significant_stops(min_stop) {
        html.push_str(&format!(
            "L.marker([{}, {}]).bindPopup({}).addTo(map);\n",
            stop.latitude,
            stop.longitude,
            js_string(&stop_popup(stop))
        ));
        html.push_str(&format!(
            "L.circleMarker([{}, {}], {{color: \"{}\", radius: {}}}).addTo(map);\n",
            stop.latitude,
            stop.longitude,
            STOP_COLOR,
            stop.elapsed_minutes() as f64 / 4.0
        ));
    }

    html.push_str("</script>\n</body>\n</html>\n");
    Ok(html)
}

/// Write the HTML map page
pub fn export_to_html(
    summary: &TrackSummary,
    input_path: &Path,
    export_options: &ExportOptions,
    min_stop: Duration,
) -> Result<PathBuf> {
    let path = compute_export_paths(input_path, export_options).html;
    let title = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("track");

    let html = render_html(summary, title, min_stop)?;
    let mut writer = create_output_file(&path)?;
    writer.write_all(html.as_bytes())?;
    writer.flush()?;

    info!("Exported map to: {}", path.display());
    Ok(path)
}

/// Write significant stops to CSV
#[cfg(feature = "csv")]
pub fn export_stops_to_csv(
    summary: &TrackSummary,
    input_path: &Path,
    export_options: &ExportOptions,
    min_stop: Duration,
) -> Result<PathBuf> {
    let path = compute_export_paths(input_path, export_options).csv;
    let mut writer = csv::Writer::from_writer(create_output_file(&path)?);

    writer.write_record([
        "latitude",
        "longitude",
        "start_time",
        "end_time",
        "elapsed_minutes",
        "elapsed",
        "map_url",
    ])?;
    for stop in summary.significant_stops(min_stop) {
        writer.write_record([
            stop.latitude.to_string(),
            stop.longitude.to_string(),
            stop.start_time.to_rfc3339(),
            stop.end_time.to_rfc3339(),
            stop.elapsed_minutes().to_string(),
            stop.elapsed_label(),
            stop.maps_url(),
        ])?;
    }
    writer.flush()?;

    info!("Exported stops to: {}", path.display());
    Ok(path)
}

/// Write the simplified route and significant stops to GPX
pub fn export_route_to_gpx(
    summary: &TrackSummary,
    input_path: &Path,
    export_options: &ExportOptions,
    min_stop: Duration,
) -> Result<PathBuf> {
    let path = compute_export_paths(input_path, export_options).gpx;
    let name = xml_escape(
        input_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("track"),
    );

    let mut gpx_file = create_output_file(&path)?;
    writeln!(gpx_file, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        gpx_file,
        r#"<gpx creator="rest_with_gps" version="1.1" xmlns="http://www.topografix.com/GPX/1/1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">"#
    )?;
    writeln!(gpx_file, "<metadata><name>{}</name></metadata>", name)?;

    for stop in summary.significant_stops(min_stop) {
        writeln!(
            gpx_file,
            r#"  <wpt lat="{:.7}" lon="{:.7}"><time>{}</time><name>{}</name><desc>{}</desc></wpt>"#,
            stop.latitude,
            stop.longitude,
            stop.start_time.to_rfc3339(),
            xml_escape(&stop.elapsed_label()),
            xml_escape(&stop.time_range_label())
        )?;
    }

    writeln!(gpx_file, "<rte><name>{}</name>", name)?;
    for vertex in &summary.route {
        writeln!(
            gpx_file,
            r#"  <rtept lat="{:.7}" lon="{:.7}"/>"#,
            vertex.latitude, vertex.longitude
        )?;
    }
    writeln!(gpx_file, "</rte>")?;
    writeln!(gpx_file, "</gpx>")?;
    gpx_file.flush()?;

    info!("Exported route to: {}", path.display());
    Ok(path)
}

/// Write the whole summary as JSON
#[cfg(feature = "json")]
pub fn export_summary_to_json(
    summary: &TrackSummary,
    input_path: &Path,
    export_options: &ExportOptions,
) -> Result<PathBuf> {
    let path = compute_export_paths(input_path, export_options).json;
    let mut writer = create_output_file(&path)?;
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.flush()?;

    info!("Exported summary to: {}", path.display());
    Ok(path)
}

/// Run every export enabled in `export_options`
pub fn export_all(
    summary: &TrackSummary,
    input_path: &Path,
    export_options: &ExportOptions,
    config: &AnalysisConfig,
) -> Result<ExportReport> {
    let mut report = ExportReport::default();

    if export_options.html {
        report.html_path = Some(export_to_html(
            summary,
            input_path,
            export_options,
            config.min_stop,
        )?);
    }

    if export_options.csv {
        #[cfg(feature = "csv")]
        {
            report.csv_path = Some(export_stops_to_csv(
                summary,
                input_path,
                export_options,
                config.min_stop,
            )?);
        }
        #[cfg(not(feature = "csv"))]
        return Err(TrackError::Export(
            "CSV export requires the `csv` feature".to_string(),
        ));
    }

    if export_options.gpx {
        report.gpx_path = Some(export_route_to_gpx(
            summary,
            input_path,
            export_options,
            config.min_stop,
        )?);
    }

    if export_options.json {
        #[cfg(feature = "json")]
        {
            report.json_path = Some(export_summary_to_json(summary, input_path, export_options)?);
        }
        #[cfg(not(feature = "json"))]
        return Err(TrackError::Export(
            "JSON export requires the `json` feature".to_string(),
        ));
    }

    Ok(report)
}
