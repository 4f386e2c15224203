// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Record field carrying the reveal threshold, in seconds since recording start.
pub const TIMESTAMP_FIELD: &str = "time_since_recording_start";

/// Payload fields tried, in order, when a human-readable label is needed.
pub const LABEL_FIELDS: [&str; 4] = ["name", "title", "summary", "uuid"];

/// Version byte mixed into every digest. Bump when the digest layout changes.
pub const DIGEST_VERSION: u8 = 1;
