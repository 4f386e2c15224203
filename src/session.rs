// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Reveal Session
//!
//! Owns everything one playback session needs: its catalog, cursor, store
//! and timeline adapter. Nothing here is process-wide, so two sessions can
//! never observe each other's state.
//!
//! # Lifecycle
//! 1. `new()` - catalog `Loading`, cursor 0, store empty
//! 2. samples may arrive while loading; they reveal nothing
//! 3. `install()` - exactly once, `Loaded` or `Unavailable`
//! 4. the next sample evaluates the whole backlog from the current cursor
//! 5. drop the session to tear it down

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::clock::{ClockSample, PlaybackSignal, TimelineSource};
use crate::cursor::{RevealBatch, RevealCursor};
use crate::error::{KernelError, KernelResult};
use crate::store::ExposedStore;
use crate::types::timestamp::Timestamped;

/// Result of a catalog load, consumed once by the session.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome<E> {
    Loaded(Catalog<E>),
    Unavailable,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CatalogState<E> {
    Loading,
    Loaded(Catalog<E>),
    Unavailable,
}

impl<E> CatalogState<E> {
    pub fn phase(&self) -> CatalogPhase {
        match self {
            CatalogState::Loading => CatalogPhase::Loading,
            CatalogState::Loaded(_) => CatalogPhase::Loaded,
            CatalogState::Unavailable => CatalogPhase::Unavailable,
        }
    }

    pub fn catalog(&self) -> Option<&Catalog<E>> {
        match self {
            CatalogState::Loaded(catalog) => Some(catalog),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogPhase {
    Loading,
    Loaded,
    Unavailable,
}

/// Point-in-time view of a session, for status reporting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub phase: CatalogPhase,
    pub cursor: usize,
    pub catalog_len: usize,
    pub exposed: usize,
    pub exhausted: bool,
    pub ended: bool,
    pub last_sample: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct RevealSession<E> {
    catalog: CatalogState<E>,
    cursor: RevealCursor,
    store: ExposedStore<E>,
    timeline: TimelineSource,
}

impl<E: Timestamped + Clone> RevealSession<E> {
    pub fn new() -> Self {
        Self {
            catalog: CatalogState::Loading,
            cursor: RevealCursor::new(),
            store: ExposedStore::new(),
            timeline: TimelineSource::new(),
        }
    }

    /// Session whose catalog is already known, e.g. for offline replay.
    pub fn with_catalog(catalog: Catalog<E>) -> Self {
        let mut session = Self::new();
        session.catalog = CatalogState::Loaded(catalog);
        session
    }

    /// Installs the load result. Write-once: a second call is rejected and
    /// leaves the session untouched.
    pub fn install(&mut self, outcome: LoadOutcome<E>) -> KernelResult<()> {
        if !matches!(self.catalog, CatalogState::Loading) {
            return Err(KernelError::CatalogAlreadyInstalled);
        }
        self.catalog = match outcome {
            LoadOutcome::Loaded(catalog) => CatalogState::Loaded(catalog),
            LoadOutcome::Unavailable => CatalogState::Unavailable,
        };
        Ok(())
    }

    /// Feeds a raw host notification through the timeline adapter.
    pub fn on_signal(&mut self, signal: PlaybackSignal) -> RevealBatch {
        let sample = self.timeline.observe(signal);
        self.reveal(sample)
    }

    /// Feeds an already-adapted sample.
    pub fn on_sample(&mut self, sample: ClockSample) -> RevealBatch {
        self.on_signal(PlaybackSignal::TimeUpdate(sample.seconds()))
    }

    fn reveal(&mut self, sample: ClockSample) -> RevealBatch {
        match &self.catalog {
            CatalogState::Loaded(catalog) => self.cursor.advance(catalog, sample, &mut self.store),
            CatalogState::Loading | CatalogState::Unavailable => {
                RevealBatch::idle(self.cursor.position(), self.store.len())
            }
        }
    }

    pub fn exposed(&self) -> &ExposedStore<E> {
        &self.store
    }

    pub fn cursor(&self) -> RevealCursor {
        self.cursor
    }

    pub fn catalog_state(&self) -> &CatalogState<E> {
        &self.catalog
    }

    pub fn timeline(&self) -> &TimelineSource {
        &self.timeline
    }

    pub fn status(&self) -> SessionStatus {
        let catalog_len = self.catalog.catalog().map_or(0, Catalog::len);
        SessionStatus {
            phase: self.catalog.phase(),
            cursor: self.cursor.position(),
            catalog_len,
            exposed: self.store.len(),
            exhausted: matches!(self.catalog, CatalogState::Loaded(_)) && self.cursor.position() >= catalog_len,
            ended: self.timeline.has_ended(),
            last_sample: self.timeline.last_sample().seconds(),
        }
    }

    /// Hands the reveal log to the caller, ending the session.
    pub fn into_exposed(self) -> ExposedStore<E> {
        self.store
    }
}

impl<E: Timestamped + Clone> Default for RevealSession<E> {
    fn default() -> Self {
        Self::new()
    }
}
