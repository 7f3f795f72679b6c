//! Stop detection and route simplification
//!
//! [`TrackAnalyzer`] walks resampled samples pairwise. The speed between two
//! consecutive samples decides whether the subject is stopped or moving; the
//! planar heading of each leg decides whether the new sample becomes a route
//! vertex. Both run in the same pass.

use crate::config::AnalysisConfig;
use crate::error::{Result, TrackError};
use crate::geometry::{bearing, distance, speed};
use crate::resample::Resampler;
use crate::source::PointSource;
use crate::types::{Position, Sample, StopInterval, TrackSummary};
use log::{debug, info, warn};

/// Movement classification of one leg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Stopped,
    Moving,
    /// No time elapsed between the samples, so no speed is defined
    Unknown,
}

/// Stateful stop/move classifier and route simplifier
#[derive(Debug, Clone)]
pub struct TrackAnalyzer {
    config: AnalysisConfig,
    open_stop: Option<StopInterval>,
    previous: Option<Sample>,
    previous_bearing: f64,
    stops: Vec<StopInterval>,
    route: Vec<Position>,
}

impl TrackAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            open_stop: None,
            previous: None,
            previous_bearing: 0.0,
            stops: Vec::new(),
            route: Vec::new(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Stop currently being extended, if any
    pub fn open_stop(&self) -> Option<&StopInterval> {
        self.open_stop.as_ref()
    }

    pub fn stops(&self) -> &[StopInterval] {
        &self.stops
    }

    pub fn route(&self) -> &[Position] {
        &self.route
    }

    /// Feed the next resampled sample
    ///
    /// Returns the classification of the leg ending at `sample`, or `None` for
    /// the very first sample.
    pub fn push(&mut self, sample: Sample) -> Option<Motion> {
        let Some(previous) = self.previous.replace(sample) else {
            self.route.push(sample.position());
            return None;
        };

        let motion = self.classify(&previous, &sample);
        match motion {
            Motion::Stopped => match self.open_stop.as_mut() {
                Some(stop) => stop.extend_to(&sample),
                None => {
                    debug!(
                        "Stop opened at {:.6},{:.6} ({})",
                        sample.latitude, sample.longitude, sample.timestamp
                    );
                    self.open_stop = Some(StopInterval::open(&sample, self.config.display_offset));
                }
            },
            Motion::Moving => {
                if let Some(stop) = self.open_stop.take() {
                    debug!(
                        "Stop closed at {:.6},{:.6} after {}",
                        stop.latitude,
                        stop.longitude,
                        stop.elapsed_label()
                    );
                    self.stops.push(stop);
                }
            }
            Motion::Unknown => {}
        }

        let heading = bearing(&previous.position(), &sample.position());
        if (heading - self.previous_bearing).abs() >= self.config.heading_threshold {
            self.route.push(sample.position());
        }
        self.previous_bearing = heading;

        Some(motion)
    }

    fn classify(&self, previous: &Sample, sample: &Sample) -> Motion {
        let elapsed = sample.timestamp - previous.timestamp;
        let seconds = elapsed.num_milliseconds() as f64 / 1000.0;
        if seconds < 0.0 {
            warn!(
                "Timestamp went backwards ({} -> {}), leg not classified",
                previous.timestamp, sample.timestamp
            );
        }

        let km = distance(&previous.position(), &sample.position());
        match speed(km, seconds) {
            Some(v) if v < self.config.min_speed_kmh => Motion::Stopped,
            Some(_) => Motion::Moving,
            None => Motion::Unknown,
        }
    }

    /// Finish the pass and return the collected stops and route
    ///
    /// A stop still open when the track ends is dropped, it is not appended.
    pub fn finish(self) -> TrackSummary {
        if let Some(stop) = &self.open_stop {
            warn!(
                "Track ended while stopped at {:.6},{:.6} ({}), stop discarded",
                stop.latitude,
                stop.longitude,
                stop.elapsed_label()
            );
        }

        TrackSummary {
            stops: self.stops,
            route: self.route,
        }
    }
}

/// Feed already resampled samples through a fresh analyzer
pub fn analyze_resampled<I>(samples: I, config: &AnalysisConfig) -> TrackSummary
where
    I: IntoIterator<Item = Sample>,
{
    let mut analyzer = TrackAnalyzer::new(*config);
    for sample in samples {
        analyzer.push(sample);
    }
    analyzer.finish()
}

/// Resample raw samples and analyze them
pub fn analyze_samples<I>(samples: I, config: &AnalysisConfig) -> TrackSummary
where
    I: IntoIterator<Item = Sample>,
{
    let resampled = Resampler::new(samples.into_iter(), config.resample_window);
    let summary = analyze_resampled(resampled, config);

    info!(
        "Found {} stops ({} significant), route has {} vertices",
        summary.stops.len(),
        summary.significant_stops(config.min_stop).count(),
        summary.route.len()
    );

    summary
}

/// Run the whole pipeline over a point source
///
/// The first error reported by the source stops the pass and is returned.
pub fn analyze_source(source: Box<dyn PointSource>, config: &AnalysisConfig) -> Result<TrackSummary> {
    config.validate()?;

    let name = source.name().to_string();
    let mut failure: Option<TrackError> = None;
    let mut count = 0usize;

    let samples = source.into_samples().map_while(|item| match item {
        Ok(sample) => {
            count += 1;
            Some(sample)
        }
        Err(e) => {
            failure = Some(e);
            None
        }
    });
    let summary = analyze_samples(samples, config);

    if let Some(e) = failure {
        return Err(e);
    }

    debug!("{}: analyzed {} raw samples", name, count);
    Ok(summary)
}
