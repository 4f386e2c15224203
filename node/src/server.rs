// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::*;
use crate::errors::NodeError;
use crate::loader::{recording_path, validate_recording_id, CatalogSource};
use crate::registry::SessionRegistry;

pub struct AppState<S> {
    pub registry: Arc<SessionRegistry<S>>,
    pub recordings_dir: Arc<PathBuf>,
}

// Manual impl: `S` itself need not be Clone.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            recordings_dir: self.recordings_dir.clone(),
        }
    }
}

impl<S: CatalogSource + 'static> AppState<S> {
    pub fn new(registry: SessionRegistry<S>, recordings_dir: PathBuf) -> Self {
        Self {
            registry: Arc::new(registry),
            recordings_dir: Arc::new(recordings_dir),
        }
    }
}

pub fn build_router<S: CatalogSource + 'static>(state: AppState<S>) -> Router {
    Router::new()
        // Recording files
        .route("/load_recording", post(load_recording::<S>))
        .route("/recordings/:file", get(static_recording::<S>))
        // Sessions v1
        .route("/v1/sessions", post(open_session::<S>))
        .route("/v1/sessions/:id", axum::routing::delete(close_session::<S>))
        .route("/v1/sessions/:id/clock", post(clock::<S>))
        .route("/v1/sessions/:id/entities", get(entities::<S>))
        .route("/v1/sessions/:id/status", get(status::<S>))
        // Observability
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn read_recording(dir: &std::path::Path, recording_id: &str) -> Result<Vec<u8>, NodeError> {
    let path = recording_path(dir, recording_id);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(NodeError::NotFound(format!("recording {}", recording_id)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Serves a saved recording as a download, like the study backend did.
async fn load_recording<S: CatalogSource + 'static>(
    State(state): State<AppState<S>>,
    Json(req): Json<LoadRecordingRequest>,
) -> Result<Response, NodeError> {
    let recording_id = req.recording_name.unwrap_or_default();
    validate_recording_id(&recording_id)?;

    let bytes = read_recording(&state.recordings_dir, &recording_id).await?;
    tracing::debug!("Serving recording {} ({} bytes)", recording_id, bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("Attachment;filename={}.json", recording_id),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// `GET /recordings/<id>.json`, the static primary source when this node serves itself.
async fn static_recording<S: CatalogSource + 'static>(
    State(state): State<AppState<S>>,
    Path(file): Path<String>,
) -> Result<Response, NodeError> {
    let recording_id = file
        .strip_suffix(".json")
        .ok_or_else(|| NodeError::NotFound(file.clone()))?;
    validate_recording_id(recording_id)?;

    let path = recording_path(&state.recordings_dir, recording_id);
    let handle = match tokio::fs::File::open(&path).await {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(NodeError::NotFound(format!("recording {}", recording_id)));
        }
        Err(e) => return Err(e.into()),
    };

    let stream = ReaderStream::new(handle);
    Ok(([(header::CONTENT_TYPE, "application/json")], Body::from_stream(stream)).into_response())
}

async fn open_session<S: CatalogSource + 'static>(
    State(state): State<AppState<S>>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<OpenSessionResponse>), NodeError> {
    let (session_id, handle) = state.registry.open(&req.recording_name)?;
    Ok((
        StatusCode::CREATED,
        Json(OpenSessionResponse {
            session_id,
            generation: handle.generation().0,
        }),
    ))
}

async fn clock<S: CatalogSource + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<u64>,
    Json(req): Json<ClockRequest>,
) -> Result<Json<ClockResponse>, NodeError> {
    let handle = state.registry.get(id)?;
    let summary = if req.ended {
        handle.ended(req.time).await?
    } else {
        handle.sample(req.time).await?
    };

    Ok(Json(ClockResponse {
        revealed: summary.revealed,
        cursor: summary.cursor,
        exposed: summary.exposed,
    }))
}

async fn entities<S: CatalogSource + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<u64>,
) -> Result<Response, NodeError> {
    let handle = state.registry.get(id)?;
    let snapshot = handle.snapshot();
    Ok(Json(&*snapshot).into_response())
}

async fn status<S: CatalogSource + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<u64>,
) -> Result<Json<StatusResponse>, NodeError> {
    let handle = state.registry.get(id)?;
    let status = handle.status().await?;
    Ok(Json(StatusResponse {
        session_id: id,
        recording_name: handle.recording_id().to_string(),
        generation: handle.generation().0,
        status,
    }))
}

async fn close_session<S: CatalogSource + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<u64>,
) -> Result<Json<CloseSessionResponse>, NodeError> {
    state.registry.close(id).await?;
    Ok(Json(CloseSessionResponse { success: true }))
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
