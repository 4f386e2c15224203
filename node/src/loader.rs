// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Catalog Loader
//!
//! Resolves a recording identifier into the catalog a session will reveal.
//!
//! # Protocol
//! 1. Try the primary source (static `<id>.json`)
//! 2. On failure, try the fallback (`POST /load_recording`) once
//! 3. First success wins; if both fail the catalog is `Unavailable`
//!
//! Failures are logged, never returned: a session without a catalog simply
//! never reveals anything. No retries and no timeouts beyond what each
//! source does on its own. A cancelled load stops before the next attempt.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use cuecard_kernel::{decode_catalog, Catalog, EntityRecord, LoadOutcome};

use crate::api::LoadRecordingRequest;
use crate::config::{NodeConfig, PrimarySource};
use crate::errors::NodeError;
use crate::telemetry::{CATALOG_LOADS, CATALOG_LOAD_DURATION, CATALOG_UNAVAILABLE};

pub type RecordCatalog = Catalog<EntityRecord>;

/// A place a catalog can be fetched from.
pub trait CatalogSource: Send + Sync {
    /// Short name used in logs and metric labels.
    fn name(&self) -> &'static str;

    fn fetch(&self, recording_id: &str) -> impl Future<Output = Result<RecordCatalog, NodeError>> + Send;
}

/// Recording ids name files, so they must not walk out of a directory.
pub fn validate_recording_id(recording_id: &str) -> Result<(), NodeError> {
    if recording_id.is_empty() {
        return Err(NodeError::InvalidInput("no recordingName in request".to_string()));
    }
    if recording_id.contains(['/', '\\']) || recording_id.contains("..") {
        return Err(NodeError::InvalidInput(format!("invalid recordingName: {}", recording_id)));
    }
    Ok(())
}

pub fn recording_path(dir: &Path, recording_id: &str) -> PathBuf {
    dir.join(format!("{}.json", recording_id))
}

fn decode_body(source: &str, recording_id: &str, bytes: &[u8]) -> Result<RecordCatalog, NodeError> {
    let (catalog, report) = decode_catalog(bytes)?;
    if report.skipped() > 0 {
        tracing::warn!(
            "Catalog {} from {}: skipping {} null and {} malformed slots",
            recording_id, source, report.nulls, report.malformed
        );
    }
    Ok(catalog)
}

/// `<root>/<id>.json` on local disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CatalogSource for DirectorySource {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn fetch(&self, recording_id: &str) -> Result<RecordCatalog, NodeError> {
        validate_recording_id(recording_id)?;
        let path = recording_path(&self.root, recording_id);
        let bytes = tokio::fs::read(&path).await?;
        decode_body(self.name(), recording_id, &bytes)
    }
}

/// `GET <base>/<id>.json`.
#[derive(Debug, Clone)]
pub struct HttpStaticSource {
    base_url: String,
    client: Client,
}

impl HttpStaticSource {
    pub fn new(url: String, client: Client) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

impl CatalogSource for HttpStaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self, recording_id: &str) -> Result<RecordCatalog, NodeError> {
        validate_recording_id(recording_id)?;
        let url = format!("{}/{}.json", self.base_url, recording_id);
        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(NodeError::Network(format!("Static catalog request failed: {}", resp.status())));
        }

        let bytes = resp.bytes().await?;
        decode_body(self.name(), recording_id, &bytes)
    }
}

/// `POST <base>/load_recording` with `{ "recordingName": <id> }`.
#[derive(Debug, Clone)]
pub struct RecordingEndpointSource {
    base_url: String,
    client: Client,
}

impl RecordingEndpointSource {
    pub fn new(url: String, client: Client) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

impl CatalogSource for RecordingEndpointSource {
    fn name(&self) -> &'static str {
        "backend"
    }

    async fn fetch(&self, recording_id: &str) -> Result<RecordCatalog, NodeError> {
        let url = format!("{}/load_recording", self.base_url);
        let payload = LoadRecordingRequest {
            recording_name: Some(recording_id.to_string()),
        };
        let resp = self.client.post(&url).json(&payload).send().await?;

        if !resp.status().is_success() {
            return Err(NodeError::Network(format!("Recording request failed: {}", resp.status())));
        }

        let bytes = resp.bytes().await?;
        decode_body(self.name(), recording_id, &bytes)
    }
}

/// The sources a node can be configured with.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Directory(DirectorySource),
    Static(HttpStaticSource),
    Backend(RecordingEndpointSource),
}

impl CatalogSource for ConfiguredSource {
    fn name(&self) -> &'static str {
        match self {
            ConfiguredSource::Directory(s) => s.name(),
            ConfiguredSource::Static(s) => s.name(),
            ConfiguredSource::Backend(s) => s.name(),
        }
    }

    async fn fetch(&self, recording_id: &str) -> Result<RecordCatalog, NodeError> {
        match self {
            ConfiguredSource::Directory(s) => s.fetch(recording_id).await,
            ConfiguredSource::Static(s) => s.fetch(recording_id).await,
            ConfiguredSource::Backend(s) => s.fetch(recording_id).await,
        }
    }
}

/// What a load produced and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub outcome: LoadOutcome<EntityRecord>,
    pub source: Option<&'static str>,
}

impl LoadReport {
    pub fn unavailable() -> Self {
        Self {
            outcome: LoadOutcome::Unavailable,
            source: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogLoader<S> {
    primary: S,
    fallback: Option<S>,
}

impl CatalogLoader<ConfiguredSource> {
    pub fn from_config(cfg: &NodeConfig) -> Self {
        let client = Client::new();
        let primary = match &cfg.primary {
            PrimarySource::Directory(dir) => ConfiguredSource::Directory(DirectorySource::new(dir.clone())),
            PrimarySource::Http(base) => ConfiguredSource::Static(HttpStaticSource::new(base.clone(), client.clone())),
        };
        let fallback = cfg
            .backend_url
            .clone()
            .map(|url| ConfiguredSource::Backend(RecordingEndpointSource::new(url, client)));
        Self::new(primary, fallback)
    }
}

impl<S: CatalogSource> CatalogLoader<S> {
    pub fn new(primary: S, fallback: Option<S>) -> Self {
        Self { primary, fallback }
    }

    /// Resolves the catalog for `recording_id`. Never fails: every error
    /// path ends in `LoadOutcome::Unavailable`.
    pub async fn load(&self, recording_id: &str, cancel: &CancellationToken) -> LoadReport {
        if recording_id.is_empty() {
            tracing::warn!("Catalog load skipped: empty recording id");
            return LoadReport::unavailable();
        }

        let started = Instant::now();

        for source in std::iter::once(&self.primary).chain(self.fallback.as_ref()) {
            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("Catalog load for {} cancelled before {} answered", recording_id, source.name());
                    return LoadReport::unavailable();
                }
                result = source.fetch(recording_id) => result,
            };

            match attempt {
                Ok(catalog) => {
                    if let Some(index) = catalog.first_out_of_order() {
                        tracing::warn!(
                            "Catalog {} is not time-ordered (first violation at slot {}); reveals past it are best-effort",
                            recording_id, index
                        );
                    }
                    tracing::info!(
                        "Loaded catalog {} from {} ({} slots)",
                        recording_id, source.name(), catalog.len()
                    );
                    metrics::counter!(CATALOG_LOADS, 1, "source" => source.name());
                    metrics::histogram!(CATALOG_LOAD_DURATION, started.elapsed().as_secs_f64());
                    return LoadReport {
                        outcome: LoadOutcome::Loaded(catalog),
                        source: Some(source.name()),
                    };
                }
                Err(e) => {
                    tracing::warn!("Catalog source {} failed for {}: {}", source.name(), recording_id, e);
                }
            }
        }

        tracing::error!("No catalog for {}: every source failed, session will not reveal", recording_id);
        metrics::counter!(CATALOG_UNAVAILABLE, 1);
        metrics::histogram!(CATALOG_LOAD_DURATION, started.elapsed().as_secs_f64());
        LoadReport::unavailable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_recording_id_validation() {
        assert!(validate_recording_id("study_video_1").is_ok());
        assert!(validate_recording_id("").is_err());
        assert!(validate_recording_id("../etc/passwd").is_err());
        assert!(validate_recording_id("a/b").is_err());
    }

    #[tokio::test]
    async fn test_directory_source_reads_recording() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("demo.json"),
            r#"[{"uuid": "a", "time_since_recording_start": 1.5}, null]"#,
        )
        .unwrap();

        let source = DirectorySource::new(dir.path());
        let catalog = source.fetch("demo").await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.present_count(), 1);

        assert!(matches!(source.fetch("missing").await, Err(NodeError::Io(_))));
    }

    #[tokio::test]
    async fn test_directory_source_rejects_non_array() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), r#"{"oops": true}"#).unwrap();

        let source = DirectorySource::new(dir.path());
        assert!(matches!(source.fetch("bad").await, Err(NodeError::Kernel(_))));
    }
}
