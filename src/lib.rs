//! Rest with GPS
//!
//! A Rust library for finding where a GPS track stood still. It reads an
//! activity file, averages the raw fixes over fixed time windows, splits the
//! track into stops and movement by speed, and keeps a simplified route made of
//! the points where the heading changed.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export of stops
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`** (default): Read Strava JSON stream exports and write JSON summaries
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Analyze an activity file:
//! ```rust,no_run
//! use rest_with_gps::{analyze_source, open_point_source, AnalysisConfig, SourceOptions};
//! use std::path::Path;
//!
//! let config = AnalysisConfig::default();
//! let source = open_point_source(Path::new("ride.fit"), &SourceOptions::default()).unwrap();
//! let summary = analyze_source(source, &config).unwrap();
//! for stop in summary.significant_stops(config.min_stop) {
//!     println!("{} ({})", stop.time_range_label(), stop.elapsed_label());
//! }
//! ```
//!
//! Write the map page next to the input:
//! ```rust,no_run
//! use rest_with_gps::{analyze_source, export_all, open_point_source};
//! use rest_with_gps::{AnalysisConfig, ExportOptions, SourceOptions};
//! use std::path::Path;
//!
//! let path = Path::new("ride.fit");
//! let config = AnalysisConfig::default();
//! let summary = analyze_source(open_point_source(path, &SourceOptions::default()).unwrap(), &config).unwrap();
//! let report = export_all(&summary, path, &ExportOptions::default(), &config).unwrap();
//! if let Some(path) = report.html_path {
//!     println!("Map written to: {}", path.display());
//! }
//! ```
//!
//! # Public API
//!
//! ## Pipeline
//! - [`open_point_source`] - Open a FIT or Strava JSON file as a [`PointSource`]
//! - [`analyze_source`] - Resample and analyze a point source
//! - [`analyze_samples`] - Resample and analyze samples already in memory
//! - [`Resampler`] - Fixed-window averaging iterator
//! - [`TrackAnalyzer`] - Stop/move classifier and route simplifier
//!
//! ## Data Types
//! - [`Sample`] - Timestamped position
//! - [`StopInterval`] - Detected stop with derived duration helpers
//! - [`TrackSummary`] - Stops and simplified route of one track
//! - [`AnalysisConfig`] - Thresholds for the pipeline
//!
//! ## Export Functions
//! - [`export_all`] - Write every enabled output
//! - [`export_to_html`] - Map page with route and stop markers
//! - [`export_route_to_gpx`] - Simplified route as GPX
//! - [`compute_export_paths`] - Helper for consistent path computation

// Module declarations
pub mod analyzer;
pub mod config;
pub mod conversion;
pub mod error;
pub mod export;
pub mod geometry;
pub mod resample;
pub mod source;
pub mod types;

pub use analyzer::*;
pub use config::*;
pub use conversion::*;
pub use error::*;
pub use export::*;
pub use geometry::*;
pub use resample::*;
pub use source::{
    default_reference_time, open_point_source, FitPointSource, MemorySource, PointSource,
    SampleIter, SourceFormat, SourceOptions,
};
#[cfg(feature = "json")]
pub use source::StravaPointSource;
pub use types::*;
