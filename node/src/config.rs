// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_BIND_ADDR: &str = "CUECARD_BIND_ADDR";
pub const ENV_RECORDINGS_DIR: &str = "CUECARD_RECORDINGS_DIR";
pub const ENV_STATIC_BASE: &str = "CUECARD_STATIC_BASE";
pub const ENV_BACKEND_URL: &str = "CUECARD_BACKEND_URL";
pub const ENV_SESSION_IDLE_SECS: &str = "CUECARD_SESSION_IDLE_SECS";

/// Where a session's catalog comes from first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimarySource {
    /// `<dir>/<id>.json` on the local filesystem.
    Directory(PathBuf),
    /// `GET <base>/<id>.json`.
    Http(String),
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    /// Recording files served by `/load_recording` and `/recordings/:file`.
    pub recordings_dir: PathBuf,
    pub primary: PrimarySource,
    /// Base URL of the backend exposing `POST /load_recording`. `None` disables the fallback.
    pub backend_url: Option<String>,
    /// Per-session command queue depth.
    pub session_queue: usize,
    /// Sessions with no command for this long are closed and deregistered.
    pub session_idle: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            recordings_dir: PathBuf::from("recordings"),
            primary: PrimarySource::Directory(PathBuf::from("public")),
            backend_url: None,
            session_queue: 256,
            session_idle: crate::registry::DEFAULT_SESSION_IDLE,
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by `CUECARD_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            match addr.parse() {
                Ok(addr) => cfg.bind_addr = addr,
                Err(e) => tracing::warn!("Ignoring {}={:?}: {}", ENV_BIND_ADDR, addr, e),
            }
        }
        if let Some(dir) = lookup(ENV_RECORDINGS_DIR) {
            cfg.recordings_dir = PathBuf::from(dir);
        }
        if let Some(base) = lookup(ENV_STATIC_BASE) {
            cfg.primary = if base.starts_with("http://") || base.starts_with("https://") {
                PrimarySource::Http(base)
            } else {
                PrimarySource::Directory(PathBuf::from(base))
            };
        }
        cfg.backend_url = lookup(ENV_BACKEND_URL).filter(|url| !url.is_empty());
        if let Some(secs) = lookup(ENV_SESSION_IDLE_SECS) {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => cfg.session_idle = Duration::from_secs(secs),
                _ => tracing::warn!("Ignoring {}={:?}: expected a positive number of seconds", ENV_SESSION_IDLE_SECS, secs),
            }
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_BIND_ADDR, "0.0.0.0:9000"),
            (ENV_STATIC_BASE, "https://study.example.org/"),
            (ENV_BACKEND_URL, "http://localhost:8080"),
            (ENV_SESSION_IDLE_SECS, "90"),
        ]
        .into_iter()
        .collect();

        let cfg = NodeConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.primary, PrimarySource::Http("https://study.example.org/".into()));
        assert_eq!(cfg.backend_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(cfg.recordings_dir, PathBuf::from("recordings"));
        assert_eq!(cfg.session_idle, Duration::from_secs(90));
    }

    #[test]
    fn test_bad_bind_addr_keeps_default() {
        let cfg = NodeConfig::from_lookup(|k| (k == ENV_BIND_ADDR).then(|| "not-an-addr".to_string()));
        assert_eq!(cfg.bind_addr, NodeConfig::default().bind_addr);
        assert!(cfg.backend_url.is_none());

        let cfg = NodeConfig::from_lookup(|k| (k == ENV_SESSION_IDLE_SECS).then(|| "0".to_string()));
        assert_eq!(cfg.session_idle, NodeConfig::default().session_idle);
    }
}
