// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Session Actor
//!
//! One tokio task per playback session. It owns the kernel `RevealSession`
//! and processes commands strictly in arrival order, so every reveal for a
//! session is serialized without locks.
//!
//! ```text
//!   SessionHandle (Clone)      mpsc       SessionActor (one task)
//!   ┌──────────────────┐  ────────────▶  ┌─────────────────────────┐
//!   │ .sample()        │                 │ RevealSession<Record>   │
//!   │ .status()        │  ◀────────────  │ generation check        │
//!   │ .close()         │    oneshot      │ publishes snapshots     │
//!   └──────────────────┘                 └─────────────────────────┘
//!            ▲                                       │
//!            └──────────── watch<Snapshot> ──────────┘
//! ```
//!
//! The catalog load runs in its own task and reports back with the
//! generation it was started for. A load that finishes after close is
//! dropped by the load task itself: the cancelled token or the closed channel
//! stops it before it reaches the actor. The generation check in the actor is
//! a second guard for any completion that is not the actor's own.
//!
//! An actor that receives no command for its idle timeout closes itself, the
//! same as an explicit close.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use cuecard_kernel::{EntityRecord, PlaybackSignal, RevealSession, SessionStatus};

use crate::errors::NodeError;
use crate::loader::{CatalogLoader, CatalogSource, LoadReport};
use crate::telemetry::{ENTITIES_REVEALED, REVEAL_BATCHES, SESSIONS_ACTIVE};

/// Immutable view of a session's reveal log. A new one is published per batch.
pub type Snapshot = Arc<[EntityRecord]>;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Identifies one session incarnation. Never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next() -> Self {
        Generation(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }
}

/// What one clock sample did, as seen by the caller that sent it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealSummary {
    pub revealed: usize,
    pub cursor: usize,
    pub exposed: usize,
}

enum SessionCommand {
    Signal {
        signal: PlaybackSignal,
        reply: oneshot::Sender<RevealSummary>,
    },
    CatalogReady {
        generation: Generation,
        report: LoadReport,
    },
    Status {
        reply: oneshot::Sender<SessionStatus>,
    },
    Close,
}

impl std::fmt::Debug for SessionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionCommand::Signal { signal, .. } => write!(f, "Signal({:?})", signal),
            SessionCommand::CatalogReady { generation, .. } => write!(f, "CatalogReady({:?})", generation),
            SessionCommand::Status { .. } => f.write_str("Status"),
            SessionCommand::Close => f.write_str("Close"),
        }
    }
}

struct SessionActor {
    recording_id: Arc<str>,
    generation: Generation,
    session: RevealSession<EntityRecord>,
    rx: mpsc::Receiver<SessionCommand>,
    snapshot_tx: watch::Sender<Snapshot>,
    cancel: CancellationToken,
    idle: Duration,
}

impl SessionActor {
    async fn run(mut self) {
        metrics::increment_gauge!(SESSIONS_ACTIVE, 1.0);
        tracing::debug!("Session {} ({:?}) started", self.recording_id, self.generation);

        loop {
            let cmd = match tokio::time::timeout(self.idle, self.rx.recv()).await {
                Ok(Some(cmd)) => cmd,
                Ok(None) => break,
                Err(_) => {
                    tracing::info!(
                        "Session {} ({:?}) idle for {:?}, closing",
                        self.recording_id,
                        self.generation,
                        self.idle
                    );
                    break;
                }
            };
            match cmd {
                SessionCommand::Signal { signal, reply } => {
                    let summary = self.apply(signal);
                    // Caller may have given up waiting; the reveal still happened.
                    let _ = reply.send(summary);
                }
                SessionCommand::CatalogReady { generation, report } => self.install(generation, report),
                SessionCommand::Status { reply } => {
                    let _ = reply.send(self.session.status());
                }
                SessionCommand::Close => break,
            }
        }

        // Also covers idle expiry, where no handle called close().
        self.cancel.cancel();
        metrics::decrement_gauge!(SESSIONS_ACTIVE, 1.0);
        tracing::debug!(
            "Session {} ({:?}) closed with {} exposed",
            self.recording_id,
            self.generation,
            self.session.exposed().len()
        );
    }

    fn apply(&mut self, signal: PlaybackSignal) -> RevealSummary {
        let batch = self.session.on_signal(signal);

        if batch.revealed() > 0 {
            // Publish the whole batch at once; readers never see half of it.
            let snapshot: Snapshot = Arc::from(self.session.exposed().read());
            self.snapshot_tx.send_replace(snapshot);

            metrics::counter!(ENTITIES_REVEALED, batch.revealed() as u64);
            metrics::counter!(REVEAL_BATCHES, 1);
            tracing::debug!(
                "Session {}: revealed {} (cursor {} -> {})",
                self.recording_id,
                batch.revealed(),
                batch.cursor.start,
                batch.cursor.end
            );
        }

        RevealSummary {
            revealed: batch.revealed(),
            cursor: self.session.cursor().position(),
            exposed: self.session.exposed().len(),
        }
    }

    fn install(&mut self, generation: Generation, report: LoadReport) {
        if generation != self.generation {
            tracing::warn!(
                "Session {}: discarding catalog for stale {:?} (current {:?})",
                self.recording_id,
                generation,
                self.generation
            );
            return;
        }

        if let Err(e) = self.session.install(report.outcome) {
            tracing::warn!("Session {}: {}", self.recording_id, e);
            return;
        }

        let status = self.session.status();
        tracing::info!(
            "Session {}: catalog {:?} via {} ({} slots)",
            self.recording_id,
            status.phase,
            report.source.unwrap_or("none"),
            status.catalog_len
        );
    }
}

/// Cloneable front door to a session actor.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    recording_id: Arc<str>,
    generation: Generation,
    tx: mpsc::Sender<SessionCommand>,
    snapshot_rx: watch::Receiver<Snapshot>,
    cancel: CancellationToken,
}

impl SessionHandle {
    /// Spawns the actor and starts loading the catalog. Must be called
    /// inside a tokio runtime.
    pub fn open<S: CatalogSource + 'static>(
        recording_id: &str,
        loader: Arc<CatalogLoader<S>>,
        queue: usize,
        idle: Duration,
    ) -> Self {
        let recording_id: Arc<str> = Arc::from(recording_id);
        let generation = Generation::next();
        let (tx, rx) = mpsc::channel(queue.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::from(Vec::new()));
        let cancel = CancellationToken::new();

        let actor = SessionActor {
            recording_id: recording_id.clone(),
            generation,
            session: RevealSession::new(),
            rx,
            snapshot_tx,
            cancel: cancel.clone(),
            idle,
        };
        tokio::spawn(actor.run());

        let load_tx = tx.clone();
        let token = cancel.clone();
        let id = recording_id.clone();
        tokio::spawn(async move {
            let report = loader.load(&id, &token).await;
            if token.is_cancelled() {
                tracing::debug!("Session {} closed during load; result dropped", id);
                return;
            }
            if load_tx.send(SessionCommand::CatalogReady { generation, report }).await.is_err() {
                tracing::debug!("Session {} gone before catalog arrived; result dropped", id);
            }
        });

        Self {
            recording_id,
            generation,
            tx,
            snapshot_rx,
            cancel,
        }
    }

    pub fn recording_id(&self) -> &str {
        &self.recording_id
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Forwards a raw playback notification and waits for it to be applied.
    pub async fn signal(&self, signal: PlaybackSignal) -> Result<RevealSummary, NodeError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::Signal { signal, reply })
            .await
            .map_err(|_| NodeError::SessionClosed)?;
        rx.await.map_err(|_| NodeError::SessionClosed)
    }

    /// Position-change notification. `None` before playback starts.
    pub async fn sample(&self, time: Option<f64>) -> Result<RevealSummary, NodeError> {
        self.signal(PlaybackSignal::TimeUpdate(time)).await
    }

    /// End-of-playback notification.
    pub async fn ended(&self, time: Option<f64>) -> Result<RevealSummary, NodeError> {
        self.signal(PlaybackSignal::Ended(time)).await
    }

    pub async fn status(&self) -> Result<SessionStatus, NodeError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::Status { reply })
            .await
            .map_err(|_| NodeError::SessionClosed)?;
        rx.await.map_err(|_| NodeError::SessionClosed)
    }

    /// Latest published reveal log.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that wakes on every published batch.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_rx.clone()
    }

    /// Cancels an in-flight load and stops the actor. Idempotent.
    pub async fn close(&self) {
        self.cancel.cancel();
        let _ = self.tx.send(SessionCommand::Close).await;
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves once the actor has stopped, by close or idle expiry.
    pub async fn closed(&self) {
        self.tx.closed().await
    }

    #[cfg(test)]
    async fn deliver_catalog(&self, generation: Generation, report: LoadReport) {
        let _ = self.tx.send(SessionCommand::CatalogReady { generation, report }).await;
    }
}
