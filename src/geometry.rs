//! Spherical distance, speed and heading primitives
//!
//! Distances use the spherical law of cosines on a fixed Earth radius. The
//! heading is a planar `atan2` of the coordinate deltas and is only meant for
//! comparing consecutive legs, not for navigation.

use crate::types::Position;

/// Equatorial Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6378.137;

/// Unit vector for a position on the sphere
fn to_unit_vector(position: &Position) -> [f64; 3] {
    let lat = position.latitude.to_radians();
    let lon = position.longitude.to_radians();
    let cos_lat = lat.cos();
    [cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin()]
}

/// Great-circle distance in kilometres
///
/// Returns 0 for identical positions and whenever rounding pushes the cosine
/// outside `[-1, 1]`.
pub fn distance(p0: &Position, p1: &Position) -> f64 {
    distance_with_radius(p0, p1, EARTH_RADIUS_KM)
}

pub fn distance_with_radius(p0: &Position, p1: &Position, radius: f64) -> f64 {
    if p0 == p1 {
        return 0.0;
    }

    let v0 = to_unit_vector(p0);
    let v1 = to_unit_vector(p1);
    let dot: f64 = v0.iter().zip(v1.iter()).map(|(a, b)| a * b).sum();

    if !(-1.0..=1.0).contains(&dot) {
        return 0.0;
    }

    dot.acos() * radius
}

/// Speed in km/h, `None` when no time has elapsed
pub fn speed(km: f64, seconds: f64) -> Option<f64> {
    if seconds <= 0.0 {
        return None;
    }
    Some(km / seconds * 3600.0)
}

/// Planar heading proxy in radians
pub fn bearing(p0: &Position, p1: &Position) -> f64 {
    (p1.latitude - p0.latitude).atan2(p1.longitude - p0.longitude)
}
