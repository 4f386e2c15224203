// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Entity types.

pub mod timestamp;
pub mod record;
