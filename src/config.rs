//! Tunable thresholds for the analysis pipeline
//!
//! Every stage takes its thresholds from an [`AnalysisConfig`] handed to its
//! constructor, so separate tracks can be analyzed with different settings side by side.

use crate::error::{Result, TrackError};
use chrono::{Duration, FixedOffset, Offset, Utc};

/// Width of a resampling window in seconds
pub const DEFAULT_RESAMPLE_WINDOW_SECS: i64 = 10;
/// Speed below which the subject counts as stopped (km/h)
pub const DEFAULT_MIN_SPEED_KMH: f64 = 5.0;
/// Heading change that earns a route vertex (radians)
pub const DEFAULT_HEADING_THRESHOLD: f64 = 0.1;
/// Shortest stop worth presenting (minutes)
pub const DEFAULT_MIN_STOP_MINUTES: i64 = 5;
/// Offset applied to stop times for display (minutes east of UTC)
pub const DEFAULT_DISPLAY_OFFSET_MINUTES: i32 = 120;

/// Configuration for resampling, stop detection and route simplification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub resample_window: Duration,
    pub min_speed_kmh: f64,
    pub heading_threshold: f64,
    pub min_stop: Duration,
    pub display_offset: FixedOffset,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            resample_window: Duration::seconds(DEFAULT_RESAMPLE_WINDOW_SECS),
            min_speed_kmh: DEFAULT_MIN_SPEED_KMH,
            heading_threshold: DEFAULT_HEADING_THRESHOLD,
            min_stop: Duration::minutes(DEFAULT_MIN_STOP_MINUTES),
            display_offset: FixedOffset::east_opt(DEFAULT_DISPLAY_OFFSET_MINUTES * 60)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}

impl AnalysisConfig {
    pub fn with_min_stop_minutes(mut self, minutes: i64) -> Result<Self> {
        if minutes < 0 {
            return Err(TrackError::InvalidConfig(format!(
                "minimum stop must not be negative ({} minutes)",
                minutes
            )));
        }
        self.min_stop = Duration::minutes(minutes);
        Ok(self)
    }

    pub fn with_display_offset_minutes(mut self, minutes: i32) -> Result<Self> {
        self.display_offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                TrackError::InvalidConfig(format!("UTC offset out of range ({} minutes)", minutes))
            })?;
        Ok(self)
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.resample_window <= Duration::zero() {
            return Err(TrackError::InvalidConfig(
                "resample window must be positive".to_string(),
            ));
        }
        if !self.min_speed_kmh.is_finite() || self.min_speed_kmh < 0.0 {
            return Err(TrackError::InvalidConfig(format!(
                "minimum speed must be a non-negative number ({})",
                self.min_speed_kmh
            )));
        }
        if !self.heading_threshold.is_finite() || self.heading_threshold < 0.0 {
            return Err(TrackError::InvalidConfig(format!(
                "heading threshold must be a non-negative number ({})",
                self.heading_threshold
            )));
        }
        Ok(())
    }
}
