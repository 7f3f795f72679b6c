//! Point sources
//!
//! A point source turns one input file into a forward-only, finite stream of
//! [`Sample`]s in time order. The analysis pipeline only sees the
//! [`PointSource`] trait; each supported input format implements it.

pub mod fit;
#[cfg(feature = "json")]
pub mod strava;

pub use fit::FitPointSource;
#[cfg(feature = "json")]
pub use strava::StravaPointSource;

use crate::error::{Result, TrackError};
use crate::types::Sample;
use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use std::path::Path;

/// Stream of samples produced by a point source
pub type SampleIter = Box<dyn Iterator<Item = Result<Sample>>>;

/// Something that yields the position samples of one track
pub trait PointSource {
    /// Short description used in log messages
    fn name(&self) -> &str;

    /// Consume the source and stream its samples
    ///
    /// Samples missing a position are left out. A fatal decoding problem is
    /// reported as an `Err` item, after which the stream ends.
    fn into_samples(self: Box<Self>) -> SampleIter;
}

/// Options for opening point sources
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Instant that relative time offsets in JSON stream exports count from
    pub reference_time: DateTime<Utc>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            reference_time: default_reference_time(),
        }
    }
}

/// 2023-08-20T20:30:00Z, the anchor used when nothing better is known
pub fn default_reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 8, 20, 20, 30, 0)
        .single()
        .unwrap_or_default()
}

/// Input formats with a point source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Fit,
    #[cfg(feature = "json")]
    StravaJson,
}

impl SourceFormat {
    /// Pick a format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "fit" => Ok(SourceFormat::Fit),
            #[cfg(feature = "json")]
            "json" => Ok(SourceFormat::StravaJson),
            "" => Err(TrackError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(TrackError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

/// Open the point source matching the file's extension
pub fn open_point_source(path: &Path, options: &SourceOptions) -> Result<Box<dyn PointSource>> {
    let format = SourceFormat::from_path(path)?;
    debug!("Opening {} as {:?}", path.display(), format);

    let source: Box<dyn PointSource> = match format {
        SourceFormat::Fit => Box::new(FitPointSource::open(path)?),
        #[cfg(feature = "json")]
        SourceFormat::StravaJson => {
            Box::new(StravaPointSource::open(path, options.reference_time)?)
        }
    };
    #[cfg(not(feature = "json"))]
    let _ = options;

    Ok(source)
}

/// Point source over samples already in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    samples: Vec<Sample>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }
}

impl PointSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn into_samples(self: Box<Self>) -> SampleIter {
        Box::new(self.samples.into_iter().map(Ok))
    }
}
