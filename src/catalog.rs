// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event Catalog
//!
//! The immutable, ordered sequence of timestamped entities a session reveals.
//!
//! # Invariants
//! - Built once per session, read-only afterwards
//! - Slot order is catalog order; `None` marks a null or unrevealable slot
//! - Entries are expected in non-decreasing timestamp order. This is a
//!   precondition on whoever builds the catalog. It is reported by
//!   [`Catalog::first_out_of_order`] but never repaired here.

use alloc::vec::Vec;
use serde_json::Value;

use crate::error::{KernelError, KernelResult};
use crate::types::record::EntityRecord;
use crate::types::timestamp::{Timestamp, Timestamped};

#[derive(Clone, Debug, PartialEq)]
pub struct Catalog<E> {
    slots: Vec<Option<E>>,
}

impl<E> Catalog<E> {
    pub fn new(slots: Vec<Option<E>>) -> Self {
        Self { slots }
    }

    pub fn empty() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Option<E>] {
        &self.slots
    }

    /// `None` past the end, `Some(None)` for a null slot.
    pub fn slot(&self, index: usize) -> Option<Option<&E>> {
        self.slots.get(index).map(Option::as_ref)
    }

    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn null_count(&self) -> usize {
        self.len() - self.present_count()
    }
}

impl<E> Default for Catalog<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E> FromIterator<Option<E>> for Catalog<E> {
    fn from_iter<I: IntoIterator<Item = Option<E>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<E: Timestamped> Catalog<E> {
    /// Index of the first present entry whose timestamp is smaller than the
    /// present entry before it. Null slots are skipped.
    pub fn first_out_of_order(&self) -> Option<usize> {
        let mut previous: Option<Timestamp> = None;
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(entity) = slot {
                let ts = entity.timestamp();
                if let Some(prev) = previous {
                    if ts < prev {
                        return Some(i);
                    }
                }
                previous = Some(ts);
            }
        }
        None
    }

    pub fn is_time_ordered(&self) -> bool {
        self.first_out_of_order().is_none()
    }

    /// Earliest and latest timestamps among present entries.
    pub fn span(&self) -> Option<(Timestamp, Timestamp)> {
        let mut iter = self.slots.iter().flatten().map(Timestamped::timestamp);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), ts| {
            (if ts < lo { ts } else { lo }, if ts > hi { ts } else { hi })
        }))
    }
}

/// What decoding found besides the entries themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Slots that were JSON `null`.
    pub nulls: usize,
    /// Slots that were present but could not be revealed (no usable timestamp).
    pub malformed: usize,
}

impl DecodeReport {
    pub fn skipped(&self) -> usize {
        self.nulls + self.malformed
    }
}

/// Decodes a catalog from its JSON wire form: a top-level array of records.
///
/// Unrevealable slots become `None` and keep their position, so the cursor
/// still walks past them. Anything other than an array is rejected.
pub fn decode_catalog(bytes: &[u8]) -> KernelResult<(Catalog<EntityRecord>, DecodeReport)> {
    let value: Value = serde_json::from_slice(bytes)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Err(KernelError::MalformedCatalog),
    };

    let mut report = DecodeReport::default();
    let slots = items
        .into_iter()
        .map(|item| {
            if item.is_null() {
                report.nulls += 1;
                return None;
            }
            let decoded = EntityRecord::from_value(item);
            if decoded.is_none() {
                report.malformed += 1;
            }
            decoded
        })
        .collect();

    Ok((Catalog::new(slots), report))
}
