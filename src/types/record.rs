// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Wire shape of a captured entity.
//!
//! Records are arbitrary JSON objects. The only field the engine reads is
//! `time_since_recording_start`; everything else rides along untouched in
//! `payload` and is handed back to consumers as-is.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use alloc::string::String;

use crate::config::{LABEL_FIELDS, TIMESTAMP_FIELD};
use crate::types::timestamp::{Timestamp, Timestamped};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntityRecord {
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    pub time_since_recording_start: Timestamp,
}

impl EntityRecord {
    pub fn new(timestamp: Timestamp, payload: Map<String, Value>) -> Self {
        Self {
            payload,
            time_since_recording_start: timestamp,
        }
    }

    /// Decodes one catalog slot.
    ///
    /// Returns `None` for anything that cannot be revealed: `null`, non-objects,
    /// and objects whose timestamp is missing, non-numeric, negative or non-finite.
    pub fn from_value(value: Value) -> Option<Self> {
        let mut payload = match value {
            Value::Object(map) => map,
            _ => return None,
        };
        let timestamp = payload
            .remove(TIMESTAMP_FIELD)
            .and_then(|v| v.as_f64())
            .and_then(Timestamp::new)?;
        Some(Self::new(timestamp, payload))
    }

    /// First string-valued label field, if any.
    pub fn label(&self) -> Option<&str> {
        LABEL_FIELDS
            .iter()
            .find_map(|key| self.payload.get(*key).and_then(Value::as_str))
    }
}

impl Timestamped for EntityRecord {
    fn timestamp(&self) -> Timestamp {
        self.time_since_recording_start
    }
}

impl<'de> Deserialize<'de> for EntityRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        EntityRecord::from_value(value).ok_or_else(|| {
            de::Error::custom("entity record needs a non-negative numeric time_since_recording_start")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_keeps_payload() {
        let rec = EntityRecord::from_value(json!({
            "uuid": "a1",
            "name": "Photosynthesis",
            "url": "https://example.org",
            "time_since_recording_start": 12.5
        }))
        .unwrap();

        assert_eq!(rec.timestamp().as_secs(), 12.5);
        assert_eq!(rec.label(), Some("Photosynthesis"));
        assert_eq!(rec.payload.len(), 3);
        assert!(!rec.payload.contains_key(TIMESTAMP_FIELD));
    }

    #[test]
    fn test_decode_rejects_unrevealable_slots() {
        assert!(EntityRecord::from_value(Value::Null).is_none());
        assert!(EntityRecord::from_value(json!(3)).is_none());
        assert!(EntityRecord::from_value(json!({"uuid": "x"})).is_none());
        assert!(EntityRecord::from_value(json!({"time_since_recording_start": "4"})).is_none());
        assert!(EntityRecord::from_value(json!({"time_since_recording_start": -1.0})).is_none());
    }

    #[test]
    fn test_serialize_restores_timestamp_field() {
        let rec = EntityRecord::from_value(json!({"uuid": "b", "time_since_recording_start": 3})).unwrap();
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["time_since_recording_start"], json!(3.0));
        assert_eq!(value["uuid"], json!("b"));

        let back: EntityRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, rec);
    }
}
