//! Point source for Strava stream exports
//!
//! The export is a JSON array of streams, each `{"type": ..., "data": [...]}`.
//! Positions come from the `latlng` stream and times from the `time` stream,
//! which holds second offsets from an instant the file does not record.

use crate::conversion::seconds_to_duration;
use crate::error::{Result, TrackError};
use crate::source::{PointSource, SampleIter};
use crate::types::Sample;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Stream {
    #[serde(rename = "type")]
    kind: String,
    data: serde_json::Value,
}

/// Samples zipped from the `time` and `latlng` streams
pub struct StravaPointSource {
    name: String,
    samples: Vec<Sample>,
}

impl StravaPointSource {
    pub fn open(path: &Path, reference_time: DateTime<Utc>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(path.display().to_string(), &text, reference_time)
    }

    pub fn from_json(
        name: impl Into<String>,
        json: &str,
        reference_time: DateTime<Utc>,
    ) -> Result<Self> {
        let streams: Vec<Stream> = serde_json::from_str(json)?;

        let mut times: Option<Vec<f64>> = None;
        let mut latlngs: Option<Vec<Option<[f64; 2]>>> = None;
        for stream in streams {
            match stream.kind.as_str() {
                "time" => times = Some(serde_json::from_value(stream.data)?),
                "latlng" => latlngs = Some(serde_json::from_value(stream.data)?),
                other => debug!("Ignoring '{}' stream", other),
            }
        }

        let times = times.ok_or_else(|| TrackError::MissingStream("time".to_string()))?;
        let latlngs = latlngs.ok_or_else(|| TrackError::MissingStream("latlng".to_string()))?;
        if times.len() != latlngs.len() {
            debug!(
                "Stream lengths differ (time {}, latlng {}), using the shorter",
                times.len(),
                latlngs.len()
            );
        }

        let samples: Vec<Sample> = times
            .iter()
            .zip(latlngs.iter())
            .filter_map(|(&offset, latlng)| {
                let [latitude, longitude] = (*latlng)?;
                let timestamp = reference_time.checked_add_signed(seconds_to_duration(offset)?)?;
                Some(Sample::new(timestamp, latitude, longitude))
            })
            .collect();

        debug!("Loaded {} samples from stream export", samples.len());

        Ok(Self {
            name: name.into(),
            samples,
        })
    }
}

impl PointSource for StravaPointSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn into_samples(self: Box<Self>) -> SampleIter {
        Box::new(self.samples.into_iter().map(Ok))
    }
}
