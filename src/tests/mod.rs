#[cfg(test)]
// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod reveal_tests;
pub mod determinism_tests;

use crate::catalog::Catalog;
use crate::types::timestamp::{Timestamp, Timestamped};
use serde::Serialize;

/// Minimal catalog entry for tests.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Card {
    pub id: u32,
    pub ts: Timestamp,
}

impl Timestamped for Card {
    fn timestamp(&self) -> Timestamp {
        self.ts
    }
}

pub fn card(id: u32, secs: f64) -> Card {
    Card { id, ts: Timestamp::new(secs).unwrap() }
}

/// Catalog where entry `i` has id `i` and the given timestamp; `None` is a null slot.
pub fn catalog_of(times: &[Option<f64>]) -> Catalog<Card> {
    times
        .iter()
        .enumerate()
        .map(|(i, t)| t.map(|secs| card(i as u32, secs)))
        .collect()
}

pub fn ids(entries: &[Card]) -> std::vec::Vec<u32> {
    entries.iter().map(|c| c.id).collect()
}
