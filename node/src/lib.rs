// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod config;
pub mod errors;
pub mod api;
pub mod loader;
pub mod session;
pub mod registry;
pub mod server;
pub mod telemetry;
