pub mod inspect;
pub mod replay;
pub mod timeline;

use anyhow::Context;
use cuecard_kernel::{decode_catalog, Catalog, DecodeReport, EntityRecord};

/// Reads and decodes a catalog file.
pub fn load_catalog(path: &str) -> anyhow::Result<(Catalog<EntityRecord>, DecodeReport)> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path))?;
    let decoded = decode_catalog(&bytes).map_err(|e| anyhow::anyhow!("{}: {}", path, e))?;
    Ok(decoded)
}

/// `mm:ss.mmm`, the way the player shows elapsed time.
pub fn format_offset(secs: f64) -> String {
    let total_ms = (secs * 1000.0).round() as u64;
    let minutes = total_ms / 60_000;
    let seconds = (total_ms / 1000) % 60;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
}
