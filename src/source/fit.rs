//! Point source for FIT activity files
//!
//! Decoding is left to `fitparser`, which resolves compressed timestamps and
//! chained files. Every `record` message with a usable position becomes a
//! [`Sample`]; semicircles are converted to degrees here.

use crate::conversion::semicircles_to_degrees;
use crate::error::Result;
use crate::source::{PointSource, SampleIter};
use crate::types::Sample;
use chrono::{DateTime, Utc};
use fitparser::de::{from_bytes_with_options, DecodeOption};
use fitparser::profile::MesgNum;
use fitparser::{FitDataRecord, Value};
use log::{debug, warn};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Marker for an unset sint32 field
const INVALID_SINT32: i32 = 0x7FFF_FFFF;

/// Samples from the `record` messages of a FIT file
pub struct FitPointSource {
    name: String,
    records: Vec<FitDataRecord>,
}

impl FitPointSource {
    /// Read and decode the whole file
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        debug!("Read {} bytes from {}", data.len(), path.display());
        Self::from_bytes(path.display().to_string(), &data)
    }

    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> Result<Self> {
        let name = name.into();
        let records = decode(&name, data)?;
        debug!("Decoded {} FIT messages from {}", records.len(), name);
        Ok(Self { name, records })
    }
}

/// Decode with CRC checks, retrying without them so a bad checksum only warns
fn decode(name: &str, data: &[u8]) -> Result<Vec<FitDataRecord>> {
    let strict = match from_bytes_with_options(data, &HashSet::new()) {
        Ok(records) => return Ok(records),
        Err(e) => e,
    };

    let lenient: HashSet<DecodeOption> = [
        DecodeOption::SkipHeaderCrcValidation,
        DecodeOption::SkipDataCrcValidation,
    ]
    .into_iter()
    .collect();

    match from_bytes_with_options(data, &lenient) {
        Ok(records) => {
            warn!("{}: {}, decoded without CRC checks", name, strict);
            Ok(records)
        }
        Err(_) => Err(strict.into()),
    }
}

fn timestamp_of(record: &FitDataRecord) -> Option<DateTime<Utc>> {
    record
        .fields()
        .iter()
        .find(|field| field.name() == "timestamp")
        .and_then(|field| match field.value() {
            Value::Timestamp(ts) => Some(ts.with_timezone(&Utc)),
            _ => None,
        })
}

fn semicircles_of(record: &FitDataRecord, name: &str) -> Option<i32> {
    record
        .fields()
        .iter()
        .find(|field| field.name() == name)
        .and_then(|field| match field.value() {
            Value::SInt32(v) if *v != INVALID_SINT32 => Some(*v),
            _ => None,
        })
}

/// Lazy conversion of decoded messages to samples
struct FitSamples {
    records: std::vec::IntoIter<FitDataRecord>,
    last_timestamp: Option<DateTime<Utc>>,
    positioned: usize,
    skipped: usize,
}

impl Iterator for FitSamples {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            // Any message may carry the time that later records refer to
            if let Some(ts) = timestamp_of(&record) {
                self.last_timestamp = Some(ts);
            }
            if record.kind() != MesgNum::Record {
                continue;
            }

            let lat = semicircles_of(&record, "position_lat");
            let long = semicircles_of(&record, "position_long");
            let sample = match (self.last_timestamp, lat, long) {
                (Some(ts), Some(lat), Some(long)) => Some(Sample::new(
                    ts,
                    semicircles_to_degrees(lat),
                    semicircles_to_degrees(long),
                )),
                _ => None,
            };

            match sample {
                Some(sample) if sample.position().is_valid() => {
                    self.positioned += 1;
                    return Some(Ok(sample));
                }
                _ => self.skipped += 1,
            }
        }

        if self.positioned + self.skipped > 0 {
            debug!(
                "FIT decoding done: {} positioned records, {} without position",
                self.positioned, self.skipped
            );
            self.positioned = 0;
            self.skipped = 0;
        }
        None
    }
}

impl PointSource for FitPointSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn into_samples(self: Box<Self>) -> SampleIter {
        Box::new(FitSamples {
            records: self.records.into_iter(),
            last_timestamp: None,
            positioned: 0,
            skipped: 0,
        })
    }
}
