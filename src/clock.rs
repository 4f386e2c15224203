// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Timeline Source
//!
//! Adapter over the host's playback clock. Readings arrive irregularly, may
//! be undefined before playback starts and may move backwards on a seek.
//! They are forwarded exactly as received: no smoothing, debouncing or
//! interpolation happens here.

use serde::{Deserialize, Serialize};

use crate::types::timestamp::Timestamp;

/// One playback-position reading.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum ClockSample {
    /// Clock not started yet (or the reading was not a number).
    #[default]
    Unstarted,
    /// Seconds since recording start, as reported by the host.
    At(f64),
}

impl ClockSample {
    pub fn from_reading(reading: Option<f64>) -> Self {
        match reading {
            Some(secs) if !secs.is_nan() => ClockSample::At(secs),
            _ => ClockSample::Unstarted,
        }
    }

    pub fn seconds(&self) -> Option<f64> {
        match self {
            ClockSample::At(secs) => Some(*secs),
            ClockSample::Unstarted => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, ClockSample::At(_))
    }

    /// Strictly past `threshold`. Equality does not count, so repeated
    /// identical readings cannot fire an entry twice.
    pub fn has_passed(&self, threshold: Timestamp) -> bool {
        match self {
            ClockSample::At(secs) => *secs > threshold.as_secs(),
            ClockSample::Unstarted => false,
        }
    }
}

impl From<Option<f64>> for ClockSample {
    fn from(reading: Option<f64>) -> Self {
        ClockSample::from_reading(reading)
    }
}

impl From<f64> for ClockSample {
    fn from(secs: f64) -> Self {
        ClockSample::from_reading(Some(secs))
    }
}

/// Raw notification from the media element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlaybackSignal {
    /// Position changed.
    TimeUpdate(Option<f64>),
    /// Playback reached the end; carries the final position if known.
    Ended(Option<f64>),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimelineSource {
    last: ClockSample,
    ended: bool,
    observed: u64,
}

impl TimelineSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns a host notification into the sample handed to the cursor.
    pub fn observe(&mut self, signal: PlaybackSignal) -> ClockSample {
        let reading = match signal {
            PlaybackSignal::TimeUpdate(reading) => reading,
            PlaybackSignal::Ended(reading) => {
                self.ended = true;
                reading
            }
        };
        let sample = ClockSample::from_reading(reading);
        self.observed += 1;
        if sample.is_defined() {
            self.last = sample;
        }
        sample
    }

    /// Most recent defined sample.
    pub fn last_sample(&self) -> ClockSample {
        self.last
    }

    /// Set once an end-of-playback notification was seen. Later seeks still
    /// produce samples.
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    pub fn observed(&self) -> u64 {
        self.observed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwards_readings_unmodified() {
        let mut source = TimelineSource::new();
        assert_eq!(source.observe(PlaybackSignal::TimeUpdate(None)), ClockSample::Unstarted);
        assert_eq!(source.observe(PlaybackSignal::TimeUpdate(Some(4.25))), ClockSample::At(4.25));
        // Backwards seek is passed through as-is.
        assert_eq!(source.observe(PlaybackSignal::TimeUpdate(Some(1.0))), ClockSample::At(1.0));
        assert_eq!(source.last_sample(), ClockSample::At(1.0));
        assert_eq!(source.observed(), 3);
    }

    #[test]
    fn test_undefined_does_not_clobber_last_sample() {
        let mut source = TimelineSource::new();
        source.observe(PlaybackSignal::TimeUpdate(Some(7.0)));
        source.observe(PlaybackSignal::TimeUpdate(Some(f64::NAN)));
        assert_eq!(source.last_sample(), ClockSample::At(7.0));
    }

    #[test]
    fn test_ended_is_sticky_but_not_blocking() {
        let mut source = TimelineSource::new();
        assert_eq!(source.observe(PlaybackSignal::Ended(Some(30.0))), ClockSample::At(30.0));
        assert!(source.has_ended());
        assert_eq!(source.observe(PlaybackSignal::TimeUpdate(Some(2.0))), ClockSample::At(2.0));
        assert!(source.has_ended());
    }

    #[test]
    fn test_strict_threshold() {
        let ts = Timestamp::new(2.0).unwrap();
        assert!(!ClockSample::At(2.0).has_passed(ts));
        assert!(ClockSample::At(2.0001).has_passed(ts));
        assert!(!ClockSample::Unstarted.has_passed(ts));
    }
}
