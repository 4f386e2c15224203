// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use alloc::string::String;
use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Catalog payload was valid JSON but not an array of records.
    MalformedCatalog,
    /// A session's catalog is write-once.
    CatalogAlreadyInstalled,
    /// Timestamp was negative, NaN or infinite.
    InvalidTimestamp,
    /// JSON encoding or decoding failed.
    Encoding(String),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::MalformedCatalog => f.write_str("catalog is not a JSON array"),
            KernelError::CatalogAlreadyInstalled => f.write_str("catalog already installed for this session"),
            KernelError::InvalidTimestamp => f.write_str("timestamp must be finite and non-negative"),
            KernelError::Encoding(msg) => write!(f, "encoding error: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KernelError {}

impl From<serde_json::Error> for KernelError {
    fn from(e: serde_json::Error) -> Self {
        use alloc::string::ToString;
        KernelError::Encoding(e.to_string())
    }
}

pub type KernelResult<T> = core::result::Result<T, KernelError>;
