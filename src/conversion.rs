//! Unit conversion and display helpers
//!
//! Contains the conversions applied when samples are ingested (semicircles to
//! degrees, relative offsets to durations) and the text helpers used when
//! presenting stops.

use chrono::Duration;

/// Degrees per semicircle: a signed 32-bit range spans a half turn
pub const SEMICIRCLES_TO_DEGREES: f64 = 180.0 / 2_147_483_648.0;

/// Convert a semicircle angle to degrees
pub fn semicircles_to_degrees(semicircles: i32) -> f64 {
    semicircles as f64 * SEMICIRCLES_TO_DEGREES
}

/// Convert a relative offset in (possibly fractional) seconds to a duration
pub fn seconds_to_duration(seconds: f64) -> Option<Duration> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

/// Format a stop duration given in minutes
///
/// An hour or more renders as `"{h}h {m}m"`, anything shorter as `"{m}m"`.
pub fn elapsed_time_to_str(elapsed_minutes: i64) -> String {
    if elapsed_minutes >= 60 {
        format!("{}h {}m", elapsed_minutes / 60, elapsed_minutes % 60)
    } else {
        format!("{}m", elapsed_minutes)
    }
}

/// External map link for a position
pub fn google_maps_url(latitude: f64, longitude: f64) -> String {
    format!("https://maps.google.co.jp/maps?q={},{}", latitude, longitude)
}
