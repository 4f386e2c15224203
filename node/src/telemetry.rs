// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::OnceLock;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const ENTITIES_REVEALED: &str = "cuecard_entities_revealed_total";
pub const REVEAL_BATCHES: &str = "cuecard_reveal_batches_total";
pub const CATALOG_LOADS: &str = "cuecard_catalog_loads_total";
pub const CATALOG_UNAVAILABLE: &str = "cuecard_catalog_unavailable_total";
pub const CATALOG_LOAD_DURATION: &str = "cuecard_catalog_load_duration_seconds";
pub const SESSIONS_ACTIVE: &str = "cuecard_sessions_active";

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() {
    // 1. Initialize Tracing (Logs)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "cuecard_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Initialize Metrics (Prometheus)
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROM_HANDLE.set(handle).is_err() {
                tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
            }
        }
        Err(e) => tracing::error!("Failed to install Prometheus recorder: {}", e),
    }

    metrics::describe_counter!(ENTITIES_REVEALED, "Total number of catalog entities exposed to readers");
    metrics::describe_counter!(REVEAL_BATCHES, "Clock samples that revealed at least one entity");
    metrics::describe_counter!(CATALOG_LOADS, "Catalog loads that succeeded, by source");
    metrics::describe_counter!(CATALOG_UNAVAILABLE, "Catalog loads where every source failed");
    metrics::describe_histogram!(CATALOG_LOAD_DURATION, "Time taken to resolve a session catalog");
    metrics::describe_gauge!(SESSIONS_ACTIVE, "Sessions currently open");

    metrics::gauge!("cuecard_node_up", 1.0);
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}
