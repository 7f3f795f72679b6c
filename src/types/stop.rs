use crate::conversion::{elapsed_time_to_str, google_maps_url};
use crate::types::{Position, Sample};
use chrono::{DateTime, Duration, FixedOffset};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A span of time spent (nearly) standing still
///
/// The position is where the stop was first detected and never moves while the
/// stop is extended. Times are expressed in the display offset of the analysis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StopInterval {
    pub latitude: f64,
    pub longitude: f64,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
}

impl StopInterval {
    /// Open a zero-length stop at the sample's position
    pub fn open(sample: &Sample, offset: FixedOffset) -> Self {
        let time = sample.timestamp.with_timezone(&offset);
        Self {
            latitude: sample.latitude,
            longitude: sample.longitude,
            start_time: time,
            end_time: time,
        }
    }

    /// Move the end of the stop forward to the sample's timestamp
    pub fn extend_to(&mut self, sample: &Sample) {
        let time = sample.timestamp.with_timezone(&self.start_time.timezone());
        if time > self.end_time {
            self.end_time = time;
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Duration in whole minutes, rounding half up
    pub fn elapsed_minutes(&self) -> i64 {
        let seconds = self.duration().num_seconds();
        (seconds as f64 / 60.0 + 0.5).floor() as i64
    }

    /// Human readable duration, e.g. `1h 15m` or `45m`
    pub fn elapsed_label(&self) -> String {
        elapsed_time_to_str(self.elapsed_minutes())
    }

    /// Whether the stop lasted long enough to be worth showing
    pub fn is_significant(&self, min_stop: Duration) -> bool {
        self.duration() >= min_stop
    }

    /// Start and end rendered as `dd/HH:MM-dd/HH:MM`
    pub fn time_range_label(&self) -> String {
        format!(
            "{}-{}",
            self.start_time.format("%d/%H:%M"),
            self.end_time.format("%d/%H:%M")
        )
    }

    pub fn maps_url(&self) -> String {
        google_maps_url(self.latitude, self.longitude)
    }
}
