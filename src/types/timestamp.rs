// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Reveal thresholds.

use serde::{Deserialize, Serialize};

use crate::error::KernelError;

/// Seconds since recording start. Always finite and non-negative.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Timestamp(f64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0.0);

    /// Returns `None` for negative, NaN or infinite readings.
    pub fn new(secs: f64) -> Option<Self> {
        if secs.is_finite() && secs >= 0.0 {
            // Normalise -0.0 so the bit pattern fed to digests is stable.
            Some(Timestamp(secs + 0.0))
        } else {
            None
        }
    }

    pub fn as_secs(&self) -> f64 {
        self.0
    }

    pub fn to_bits(&self) -> u64 {
        self.0.to_bits()
    }
}

impl TryFrom<f64> for Timestamp {
    type Error = KernelError;

    fn try_from(secs: f64) -> Result<Self, Self::Error> {
        Timestamp::new(secs).ok_or(KernelError::InvalidTimestamp)
    }
}

impl From<Timestamp> for f64 {
    fn from(ts: Timestamp) -> f64 {
        ts.0
    }
}

/// Anything that can sit in a catalog slot.
pub trait Timestamped {
    fn timestamp(&self) -> Timestamp;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_readings() {
        assert!(Timestamp::new(-0.5).is_none());
        assert!(Timestamp::new(f64::NAN).is_none());
        assert!(Timestamp::new(f64::INFINITY).is_none());
        assert_eq!(Timestamp::new(2.5).map(|t| t.as_secs()), Some(2.5));
    }

    #[test]
    fn test_deserialize_validates() {
        let ts: Timestamp = serde_json::from_str("1.25").unwrap();
        assert_eq!(ts.as_secs(), 1.25);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "1.25");

        assert!(serde_json::from_str::<Timestamp>("-3.0").is_err());
        assert!(serde_json::from_str::<Timestamp>("\"soon\"").is_err());
    }

    #[test]
    fn test_negative_zero_normalised() {
        let neg = Timestamp::new(-0.0).unwrap();
        assert_eq!(neg.to_bits(), Timestamp::ZERO.to_bits());
    }
}
