//! How a platform grants access to orientation data

use super::cell::SensorFeed;

/// Access model reported by the platform at subscribe time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessGate {
    /// No orientation API exists
    Missing,
    /// Events flow without asking
    Open,
    /// Access must be requested from inside a user gesture
    UserGesture,
}

impl AccessGate {
    /// Resolve whatever can be known right away and return it.
    ///
    /// `remembered` is an earlier answer to the permission prompt. `None`
    /// means availability stays pending until a gesture-time request.
    pub fn apply(self, feed: &SensorFeed, remembered: Option<bool>) -> Option<bool> {
        let available = match (self, remembered) {
            (AccessGate::Missing, _) => false,
            (AccessGate::Open, _) => true,
            (AccessGate::UserGesture, Some(granted)) => granted,
            (AccessGate::UserGesture, None) => return None,
        };
        feed.resolve_availability(available);
        Some(available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{Availability, ReadingCell};

    #[test]
    fn test_open_and_missing_resolve_immediately() {
        let (feed, reader) = ReadingCell::channel();
        assert_eq!(AccessGate::Open.apply(&feed, None), Some(true));
        assert_eq!(reader.availability(), Availability::Available);

        let (feed, reader) = ReadingCell::channel();
        assert_eq!(AccessGate::Missing.apply(&feed, Some(true)), Some(false));
        assert_eq!(reader.availability(), Availability::Unavailable);
    }

    #[test]
    fn test_gesture_gate_stays_pending() {
        let (feed, reader) = ReadingCell::channel();
        assert_eq!(AccessGate::UserGesture.apply(&feed, None), None);
        assert_eq!(reader.availability(), Availability::Pending);

        // The answer arrives from the gesture handler later
        feed.resolve_availability(true);
        assert!(reader.is_available());
    }

    #[test]
    fn test_gesture_gate_reuses_earlier_answer() {
        let (feed, reader) = ReadingCell::channel();
        assert_eq!(AccessGate::UserGesture.apply(&feed, Some(true)), Some(true));
        assert!(reader.is_available());

        let (feed, reader) = ReadingCell::channel();
        assert_eq!(AccessGate::UserGesture.apply(&feed, Some(false)), Some(false));
        assert_eq!(reader.availability(), Availability::Unavailable);
    }
}
