// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};
use cuecard_kernel::SessionStatus;

/// Body of `POST /load_recording`, also sent by the fallback catalog source.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoadRecordingRequest {
    #[serde(rename = "recordingName", default)]
    pub recording_name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct OpenSessionRequest {
    #[serde(rename = "recordingName")]
    pub recording_name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct OpenSessionResponse {
    #[serde(rename = "sessionId")]
    pub session_id: u64,
    pub generation: u64,
}

/// One clock reading from the player. `time: null` means playback has not started.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ClockRequest {
    #[serde(default)]
    pub time: Option<f64>,
    /// Set on the media element's end-of-playback notification.
    #[serde(default)]
    pub ended: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ClockResponse {
    pub revealed: usize,
    pub cursor: usize,
    pub exposed: usize,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct StatusResponse {
    #[serde(rename = "sessionId")]
    pub session_id: u64,
    #[serde(rename = "recordingName")]
    pub recording_name: String,
    pub generation: u64,
    #[serde(flatten)]
    pub status: SessionStatus,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CloseSessionResponse {
    pub success: bool,
}
