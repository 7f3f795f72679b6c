//! Fixed-window temporal resampling
//!
//! Raw GPS fixes arrive in bursts with jitter. The resampler groups samples into
//! windows anchored at the first sample of each window and emits the mean
//! position of every window, stamped with the anchor time.

use crate::types::Sample;
use chrono::Duration;
use std::iter::Fuse;

/// Iterator adapter that averages samples per time window
pub struct Resampler<I: Iterator<Item = Sample>> {
    inner: Fuse<I>,
    window: Duration,
    buffer: Vec<Sample>,
}

impl<I: Iterator<Item = Sample>> Resampler<I> {
    pub fn new(inner: I, window: Duration) -> Self {
        Self {
            inner: inner.fuse(),
            window,
            buffer: Vec::new(),
        }
    }

    /// Average the buffered samples and start a new window with `next`
    fn emit(&mut self, next: Option<Sample>) -> Option<Sample> {
        let averaged = average(&self.buffer);
        self.buffer.clear();
        self.buffer.extend(next);
        averaged
    }
}

impl<I: Iterator<Item = Sample>> Iterator for Resampler<I> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        while let Some(sample) = self.inner.next() {
            let window_closed = self
                .buffer
                .first()
                .map_or(false, |anchor| sample.timestamp - anchor.timestamp >= self.window);

            if window_closed {
                return self.emit(Some(sample));
            }
            self.buffer.push(sample);
        }

        self.emit(None)
    }
}

/// Mean position of the samples, stamped with the first sample's time
fn average(samples: &[Sample]) -> Option<Sample> {
    let anchor = samples.first()?;
    let count = samples.len() as f64;
    let latitude = samples.iter().map(|s| s.latitude).sum::<f64>() / count;
    let longitude = samples.iter().map(|s| s.longitude).sum::<f64>() / count;
    Some(Sample::new(anchor.timestamp, latitude, longitude))
}

/// Resample a stream with the given window width
pub fn resample<I>(samples: I, window: Duration) -> Resampler<I::IntoIter>
where
    I: IntoIterator<Item = Sample>,
{
    Resampler::new(samples.into_iter(), window)
}
