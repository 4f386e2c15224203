// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Reveal Cursor
//!
//! Walks the catalog in order and moves every entry whose timestamp the clock
//! has strictly passed into the exposed store.
//!
//! # Invariants
//! - The cursor index never decreases; a backward seek reveals nothing and
//!   un-reveals nothing
//! - One sample drains every passed entry before returning, so a forward
//!   jump batches reveals but never skips one
//! - Undefined samples are no-ops
//! - Null slots carry no threshold: they never hold the cursor back and are
//!   never exposed

use core::ops::Range;

use crate::catalog::Catalog;
use crate::clock::ClockSample;
use crate::store::ExposedStore;
use crate::types::timestamp::Timestamped;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealCursor {
    index: usize,
}

impl RevealCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next catalog slot awaiting reveal.
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn is_exhausted<E>(&self, catalog: &Catalog<E>) -> bool {
        self.index >= catalog.len()
    }

    /// Applies one clock sample.
    pub fn advance<E: Timestamped + Clone>(
        &mut self,
        catalog: &Catalog<E>,
        sample: ClockSample,
        store: &mut ExposedStore<E>,
    ) -> RevealBatch {
        let cursor_from = self.index;
        let exposed_from = store.len();

        if sample.is_defined() {
            while let Some(slot) = catalog.slot(self.index) {
                if let Some(entity) = slot {
                    if !sample.has_passed(entity.timestamp()) {
                        break;
                    }
                    store.append(Some(entity.clone()));
                }
                self.index += 1;
            }
        }

        RevealBatch {
            cursor: cursor_from..self.index,
            exposed: exposed_from..store.len(),
        }
    }
}

/// What a single sample did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealBatch {
    /// Catalog slots the cursor moved over.
    pub cursor: Range<usize>,
    /// Store positions appended.
    pub exposed: Range<usize>,
}

impl RevealBatch {
    /// A batch that touched nothing, at the given positions.
    pub fn idle(cursor: usize, exposed: usize) -> Self {
        Self {
            cursor: cursor..cursor,
            exposed: exposed..exposed,
        }
    }

    pub fn revealed(&self) -> usize {
        self.exposed.len()
    }

    /// Slots passed without a reveal (null or unrevealable).
    pub fn skipped(&self) -> usize {
        self.cursor.len() - self.exposed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }
}
