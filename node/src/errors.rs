// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use cuecard_kernel::error::KernelError;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Session closed")]
    SessionClosed,
    #[error("Internal server error")]
    Internal,
}

impl From<reqwest::Error> for NodeError {
    fn from(e: reqwest::Error) -> Self {
        NodeError::Network(e.to_string())
    }
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            NodeError::Kernel(k_err) => match k_err {
                KernelError::CatalogAlreadyInstalled => (StatusCode::CONFLICT, k_err.to_string()),
                KernelError::MalformedCatalog | KernelError::InvalidTimestamp | KernelError::Encoding(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, k_err.to_string())
                }
            },
            NodeError::Network(msg) => (StatusCode::BAD_GATEWAY, msg),
            NodeError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            NodeError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            NodeError::SessionClosed => (StatusCode::GONE, "Session closed".to_string()),
            NodeError::Io(e) => {
                tracing::error!("IO error while serving request: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            NodeError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
