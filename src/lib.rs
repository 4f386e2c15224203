// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![no_std]

//! cuecard-kernel: a deterministic, no_std reveal engine that exposes
//! timestamped catalog entries as a playback clock crosses them.

extern crate alloc;

#[cfg(any(test, feature = "std"))]
#[macro_use]
extern crate std;

pub mod config;
pub mod error;
pub mod types;
pub mod catalog;
pub mod clock;
pub mod store;
pub mod cursor;
pub mod session;
pub mod verify;
pub mod replay;

pub use catalog::{decode_catalog, Catalog, DecodeReport};
pub use clock::{ClockSample, PlaybackSignal, TimelineSource};
pub use cursor::{RevealBatch, RevealCursor};
pub use session::{CatalogPhase, CatalogState, LoadOutcome, RevealSession, SessionStatus};
pub use store::ExposedStore;
pub use types::record::EntityRecord;
pub use types::timestamp::{Timestamp, Timestamped};

#[cfg(test)]
pub mod tests;
