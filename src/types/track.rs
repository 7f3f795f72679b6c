use crate::types::{Position, StopInterval};
use chrono::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bounding box of a route
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from positions, `None` when there are none.
    pub fn from_positions(positions: &[Position]) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in positions {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

/// Result of analyzing one track
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackSummary {
    /// Closed stops, in detection order
    pub stops: Vec<StopInterval>,
    /// Simplified route; the first vertex is always the first sample
    pub route: Vec<Position>,
}

impl TrackSummary {
    /// Stops that lasted at least `min_stop`
    pub fn significant_stops(&self, min_stop: Duration) -> impl Iterator<Item = &StopInterval> {
        self.stops
            .iter()
            .filter(move |stop| stop.is_significant(min_stop))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_positions(&self.route)
    }

    pub fn center(&self) -> Option<Position> {
        self.bounds().map(|b| b.center())
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }
}
