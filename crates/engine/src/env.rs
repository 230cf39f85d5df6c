// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::path::PathBuf;
use std::time::Duration;

fn duration_ms(key: &str) -> Option<Duration> {
    std::env::var(key).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// Explicit config file path (`MJ_CONFIG`).
pub fn config_path() -> Option<PathBuf> {
    std::env::var("MJ_CONFIG").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Mirroring script override (`MJ_SCRIPT`).
pub fn script() -> Option<PathBuf> {
    std::env::var("MJ_SCRIPT").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Monitor poll interval override (`MJ_POLL_INTERVAL_MS`).
pub fn poll_interval() -> Option<Duration> {
    duration_ms("MJ_POLL_INTERVAL_MS")
}

/// Retirement grace period override (`MJ_GRACE_PERIOD_MS`).
pub fn grace_period() -> Option<Duration> {
    duration_ms("MJ_GRACE_PERIOD_MS")
}

/// Shutdown drain timeout (default 5s, configurable via `MJ_DRAIN_TIMEOUT_MS`).
pub fn drain_timeout() -> Duration {
    duration_ms("MJ_DRAIN_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

/// Entitlement key supplied by the environment (`ENTITLEMENT_KEY`).
pub fn entitlement_key() -> Option<String> {
    std::env::var("ENTITLEMENT_KEY").ok().filter(|s| !s.is_empty())
}
