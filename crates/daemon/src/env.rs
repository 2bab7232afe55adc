// SPDX-License-Identifier: MIT

//! Centralized environment variable access for the daemon crate.

use std::time::Duration;

/// Protocol version (from Cargo.toml)
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log buffer capacity when unconfigured.
pub const DEFAULT_LOG_CAPACITY: usize = 300;

/// Default listening port when unconfigured.
pub const DEFAULT_PORT: u16 = 8080;

/// Listening port: `TETHER_PORT` or 8080.
pub fn port() -> u16 {
    std::env::var("TETHER_PORT").ok().and_then(|s| s.parse::<u16>().ok()).unwrap_or(DEFAULT_PORT)
}

/// Log buffer capacity: `TETHER_LOG_CAPACITY` or 300.
pub fn log_capacity() -> usize {
    std::env::var("TETHER_LOG_CAPACITY")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_LOG_CAPACITY)
}

/// Per-request I/O timeout (default 5s, configurable via `TETHER_IPC_TIMEOUT_MS`).
pub fn ipc_timeout() -> Duration {
    std::env::var("TETHER_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Shutdown drain timeout (default 5s, configurable via `TETHER_DRAIN_TIMEOUT_MS`).
pub fn drain_timeout() -> Duration {
    std::env::var("TETHER_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}
