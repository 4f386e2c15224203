//! Deterministic Replay Logic.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

use alloc::vec::Vec;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::clock::ClockSample;
use crate::cursor::RevealBatch;
use crate::error::KernelResult;
use crate::session::RevealSession;
use crate::store::ExposedStore;
use crate::types::timestamp::Timestamped;
use crate::verify::store_digest;

/// Outcome of running a sample sequence against a catalog.
#[derive(Clone, Debug)]
pub struct ReplayReport<E> {
    pub store: ExposedStore<E>,
    /// One batch per sample, in sample order.
    pub batches: Vec<RevealBatch>,
    pub cursor: usize,
}

/// Replays `samples` against a fresh session over `catalog`.
pub fn replay<E: Timestamped + Clone>(catalog: Catalog<E>, samples: &[ClockSample]) -> ReplayReport<E> {
    let mut session = RevealSession::with_catalog(catalog);
    let batches = samples.iter().map(|sample| session.on_sample(*sample)).collect();
    let cursor = session.cursor().position();

    ReplayReport {
        store: session.into_exposed(),
        batches,
        cursor,
    }
}

/// Replays and returns the digest of the resulting reveal log.
pub fn replay_and_hash<E: Timestamped + Clone + Serialize>(
    catalog: Catalog<E>,
    samples: &[ClockSample],
) -> KernelResult<[u8; 32]> {
    let report = replay(catalog, samples);
    store_digest(report.store.read())
}
