// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::errors::NodeError;
use crate::loader::{validate_recording_id, CatalogLoader, CatalogSource};
use crate::session::SessionHandle;

pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

type SessionMap = Arc<RwLock<HashMap<u64, SessionHandle>>>;

/// Open sessions by id. Each entry is an independent actor; the registry only
/// routes to them. An entry is removed on close or when its actor stops on
/// its own after the idle timeout.
pub struct SessionRegistry<S> {
    loader: Arc<CatalogLoader<S>>,
    sessions: SessionMap,
    next_id: AtomicU64,
    queue: usize,
    idle: Duration,
}

impl<S: CatalogSource + 'static> SessionRegistry<S> {
    pub fn new(loader: CatalogLoader<S>, queue: usize) -> Self {
        Self {
            loader: Arc::new(loader),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            queue,
            idle: DEFAULT_SESSION_IDLE,
        }
    }

    /// How long a session may go without a command before it is torn down.
    pub fn with_idle_timeout(mut self, idle: Duration) -> Self {
        self.idle = idle;
        self
    }

    pub fn open(&self, recording_id: &str) -> Result<(u64, SessionHandle), NodeError> {
        validate_recording_id(recording_id)?;

        let handle = SessionHandle::open(recording_id, self.loader.clone(), self.queue, self.idle);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        {
            let mut guard = self.sessions.write().map_err(|_| NodeError::Internal)?;
            guard.insert(id, handle.clone());
        }
        tracing::info!("Opened session {} for recording {} ({:?})", id, recording_id, handle.generation());

        // Deregister once the actor stops, whatever stopped it.
        let sessions = self.sessions.clone();
        let watched = handle.clone();
        tokio::spawn(async move {
            watched.closed().await;
            let removed = match sessions.write() {
                Ok(mut guard) => guard.remove(&id).is_some(),
                Err(_) => false,
            };
            if removed {
                tracing::debug!("Session {} expired and was deregistered", id);
            }
        });

        Ok((id, handle))
    }

    pub fn get(&self, id: u64) -> Result<SessionHandle, NodeError> {
        let guard = self.sessions.read().map_err(|_| NodeError::Internal)?;
        guard
            .get(&id)
            .cloned()
            .ok_or_else(|| NodeError::NotFound(format!("session {}", id)))
    }

    /// Removes the session and stops its actor.
    pub async fn close(&self, id: u64) -> Result<(), NodeError> {
        let handle = {
            let mut guard = self.sessions.write().map_err(|_| NodeError::Internal)?;
            guard.remove(&id)
        };
        match handle {
            Some(handle) => {
                handle.close().await;
                tracing::info!("Closed session {}", id);
                Ok(())
            }
            None => Err(NodeError::NotFound(format!("session {}", id))),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
