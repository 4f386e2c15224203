// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use cuecard_node::config::NodeConfig;
use cuecard_node::loader::CatalogLoader;
use cuecard_node::registry::SessionRegistry;
use cuecard_node::server::{build_router, AppState};
use cuecard_node::telemetry::init_telemetry;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    let cfg = NodeConfig::from_env();
    tracing::info!("Initializing Cuecard Node with config: {:?}", cfg);

    if !cfg.recordings_dir.exists() {
        tracing::warn!("Recordings directory {:?} does not exist; /load_recording will 404", cfg.recordings_dir);
    }
    if cfg.backend_url.is_none() {
        tracing::warn!("No backend configured: catalog loads have no fallback source");
    }

    let loader = CatalogLoader::from_config(&cfg);
    let registry = SessionRegistry::new(loader, cfg.session_queue).with_idle_timeout(cfg.session_idle);
    let app = build_router(AppState::new(registry, cfg.recordings_dir.clone()));

    let addr = cfg.bind_addr;
    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
