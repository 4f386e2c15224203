//! Deterministic Hashing.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::DIGEST_VERSION;
use crate::error::KernelResult;
use crate::types::timestamp::Timestamped;

/// Hash of a reveal log.
///
/// Covers, per entry: store position, timestamp bits and the canonical JSON
/// of the entity. Two runs of the same catalog against the same samples must
/// produce the same digest.
pub fn store_digest<E: Timestamped + Serialize>(entries: &[E]) -> KernelResult<[u8; 32]> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[DIGEST_VERSION]);
    hasher.update(&(entries.len() as u64).to_le_bytes());

    for (i, entity) in entries.iter().enumerate() {
        hasher.update(&(i as u64).to_le_bytes());
        hash_entity(&mut hasher, entity)?;
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Hash of a whole catalog, holes included.
///
/// Null slots are hashed as an absence marker at their position so that
/// `[A, null]` and `[null, A]` differ.
pub fn catalog_digest<E: Timestamped + Serialize>(catalog: &Catalog<E>) -> KernelResult<[u8; 32]> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[DIGEST_VERSION]);
    hasher.update(&(catalog.len() as u64).to_le_bytes());

    for (i, slot) in catalog.slots().iter().enumerate() {
        hasher.update(&(i as u64).to_le_bytes());
        match slot {
            Some(entity) => {
                hasher.update(&[1]); // present
                hash_entity(&mut hasher, entity)?;
            }
            None => {
                hasher.update(&[0]); // absent
            }
        }
    }

    Ok(*hasher.finalize().as_bytes())
}

fn hash_entity<E: Timestamped + Serialize>(hasher: &mut blake3::Hasher, entity: &E) -> KernelResult<()> {
    hasher.update(&entity.timestamp().to_bits().to_le_bytes());
    // serde_json's Map is ordered by key without `preserve_order`, so this is canonical.
    let body = serde_json::to_vec(entity)?;
    hasher.update(&(body.len() as u64).to_le_bytes());
    hasher.update(&body);
    Ok(())
}

/// Lowercase hex of a digest, for logs and reports.
pub fn to_hex(digest: &[u8; 32]) -> alloc::string::String {
    use core::fmt::Write;
    let mut out = alloc::string::String::with_capacity(64);
    for byte in digest {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}
