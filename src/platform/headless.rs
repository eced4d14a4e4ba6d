//! Scripted stand-ins for running without a device

use std::cell::RefCell;
use std::rc::Rc;

use crate::audio::{self, LossFeedback, RecordingError};
use crate::sensor::{SensorFeed, SensorReading, SensorSource, Subscription};

/// Sinusoidal tilt: the paddle sweeps the full width, speed wobbles gently.
///
/// Availability resolves on the first sample at or after `resolve_after_ms`,
/// like a platform query that answers a few frames late.
#[derive(Debug, Clone)]
pub struct ScriptedTilt {
    feed: Rc<RefCell<Option<SensorFeed>>>,
    resolve_after_ms: f64,
    /// Sweep period (ms)
    period_ms: f64,
}

impl ScriptedTilt {
    pub fn new(resolve_after_ms: f64, period_ms: f64) -> Self {
        Self {
            feed: Rc::new(RefCell::new(None)),
            resolve_after_ms,
            period_ms,
        }
    }

    /// Deliver the sample for time `t_ms`; no-op once unsubscribed
    pub fn sample(&self, t_ms: f64) {
        let feed = self.feed.borrow();
        let Some(feed) = feed.as_ref() else { return };

        if t_ms >= self.resolve_after_ms {
            feed.resolve_availability(true);
        }
        let phase = t_ms / self.period_ms * std::f64::consts::TAU;
        feed.publish(SensorReading::new(
            (0.05 * (phase * 0.5).sin()) as f32,
            (0.6 * phase.sin()) as f32,
        ));
    }

    pub fn is_subscribed(&self) -> bool {
        self.feed.borrow().is_some()
    }
}

impl SensorSource for ScriptedTilt {
    fn subscribe(&mut self, feed: SensorFeed, interval_ms: u32) -> Subscription {
        log::debug!("Scripted tilt subscribed ({interval_ms} ms requested)");
        *self.feed.borrow_mut() = Some(feed);
        let slot = self.feed.clone();
        Subscription::new(move || {
            slot.borrow_mut().take();
            log::debug!("Scripted tilt unsubscribed");
        })
    }
}

/// Loss feedback for hosts without a microphone
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRecorder;

impl LossFeedback for NoRecorder {
    fn trigger(&mut self) {
        audio::report(Err(RecordingError::Unsupported));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::ReadingCell;

    #[test]
    fn test_availability_resolves_late() {
        let mut tilt = ScriptedTilt::new(100.0, 4000.0);
        let (feed, reader) = ReadingCell::channel();
        let _sub = tilt.subscribe(feed, 20);

        tilt.sample(20.0);
        assert!(reader.latest().is_some());
        assert!(!reader.is_available());

        tilt.sample(120.0);
        assert!(reader.is_available());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut tilt = ScriptedTilt::new(0.0, 4000.0);
        let (feed, reader) = ReadingCell::channel();
        let sub = tilt.subscribe(feed, 20);
        assert!(tilt.is_subscribed());

        sub.cancel();
        assert!(!tilt.is_subscribed());
        tilt.sample(500.0);
        assert_eq!(reader.latest(), None);
    }

    #[test]
    fn test_no_recorder_is_harmless() {
        let mut recorder = NoRecorder;
        recorder.trigger();
        recorder.trigger();
    }
}
