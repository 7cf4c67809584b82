//! Progress reporting toward the caller.
//!
//! Not every export backend reports a fraction. When none arrives, the
//! orchestrator substitutes a time-based estimate that never reaches 1.0
//! before the backend completes.

use crate::request::TransformEvent;
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Highest fraction reported while an export is still running.
pub const MAX_IN_FLIGHT_PROGRESS: f64 = 0.99;

/// Time-based progress estimate parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressEstimate {
    /// Fraction reported when the export starts.
    pub start: f64,
    /// Ceiling of the estimate.
    pub end: f64,
    /// Time to climb from `start` to `end`.
    pub duration_ms: u64,
    /// Interval between estimated updates.
    pub interval_ms: u64,
}

impl Default for ProgressEstimate {
    fn default() -> Self {
        Self {
            start: 0.1,
            end: 0.9,
            duration_ms: 15_000,
            interval_ms: 200,
        }
    }
}

impl ProgressEstimate {
    /// Estimated fraction after `elapsed`, linear from `start` to `end`.
    pub fn at(&self, elapsed: Duration) -> f64 {
        let start = self.start.clamp(0.0, MAX_IN_FLIGHT_PROGRESS);
        let end = self.end.clamp(start, MAX_IN_FLIGHT_PROGRESS);
        if self.duration_ms == 0 {
            return end;
        }
        let t = elapsed.as_secs_f64() * 1000.0 / self.duration_ms as f64;
        if t >= 1.0 {
            return end;
        }
        start + (end - start) * t
    }

    /// Update interval, never zero.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

/// Fire-and-forget progress sink that only ever moves forward.
///
/// Sends never block; a caller that stopped listening is ignored.
#[derive(Debug)]
pub struct ProgressSink {
    tx: Sender<TransformEvent>,
    last: Mutex<f64>,
}

impl ProgressSink {
    pub fn new(tx: Sender<TransformEvent>) -> Self {
        Self {
            tx,
            last: Mutex::new(-1.0),
        }
    }

    /// Report an in-flight fraction, capped below 1.0. Returns whether an
    /// event was emitted.
    pub fn report(&self, fraction: f64) -> bool {
        if !fraction.is_finite() {
            return false;
        }
        let fraction = fraction.clamp(0.0, MAX_IN_FLIGHT_PROGRESS);
        let mut last = self.last.lock();
        if fraction <= *last {
            return false;
        }
        *last = fraction;
        let _ = self.tx.send(TransformEvent::Progress { progress: fraction });
        true
    }

    /// Send a terminal event.
    pub fn finish(&self, event: TransformEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_is_linear_and_capped() {
        let est = ProgressEstimate::default();
        assert!((est.at(Duration::ZERO) - 0.1).abs() < 1e-12);
        assert!((est.at(Duration::from_millis(7_500)) - 0.5).abs() < 1e-12);
        assert!((est.at(Duration::from_secs(15)) - 0.9).abs() < 1e-12);
        assert!((est.at(Duration::from_secs(600)) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_never_reaches_one() {
        let est = ProgressEstimate {
            start: 0.5,
            end: 1.5,
            duration_ms: 10,
            interval_ms: 0,
        };
        assert_eq!(est.at(Duration::from_secs(1)), MAX_IN_FLIGHT_PROGRESS);
        assert_eq!(est.interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_sink_is_monotonic() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sink = ProgressSink::new(tx);
        assert!(sink.report(0.0));
        assert!(sink.report(0.3));
        assert!(!sink.report(0.2));
        assert!(!sink.report(f64::NAN));
        assert!(sink.report(1.0));
        assert!(!sink.report(1.0));

        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                TransformEvent::Progress { progress: 0.0 },
                TransformEvent::Progress { progress: 0.3 },
                TransformEvent::Progress {
                    progress: MAX_IN_FLIGHT_PROGRESS
                },
            ]
        );
    }

    #[test]
    fn test_sink_ignores_dropped_receiver() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let sink = ProgressSink::new(tx);
        assert!(sink.report(0.5));
        sink.finish(TransformEvent::Progress { progress: 1.0 });
    }
}
