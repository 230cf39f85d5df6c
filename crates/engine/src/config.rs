// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor configuration (`mj.toml`).
//!
//! ```toml
//! [manager]
//! script = "/opt/cp4i/mirror-images.sh"
//! poll_interval_ms = 30000
//!
//! [defaults]
//! home_dir = "/opt/cp4i"
//! final_registry = "registry.example.com:5000"
//! ```

use mj_core::LaunchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SCRIPT: &str = "/opt/cp4i/mirror-images.sh";
pub const DEFAULT_INTERPRETER: &str = "bash";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 5_000;
pub const DEFAULT_LOG_TAIL_LINES: usize = 50;
pub const DEFAULT_WORKER_SIGNATURE: &str = "oc image mirror";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// How the manager launches and supervises scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerSettings {
    /// Mirroring script passed to the interpreter.
    pub script: PathBuf,
    pub interpreter: String,
    pub poll_interval_ms: u64,
    /// How long a terminal job stays visible before removal.
    pub grace_period_ms: u64,
    pub log_tail_lines: usize,
    /// Command-line fragment identifying stray mirror workers.
    pub worker_signature: String,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            script: PathBuf::from(DEFAULT_SCRIPT),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
            log_tail_lines: DEFAULT_LOG_TAIL_LINES,
            worker_signature: DEFAULT_WORKER_SIGNATURE.to_string(),
        }
    }
}

impl ManagerSettings {
    mj_core::setters! {
        into {
            script: PathBuf,
            interpreter: String,
            worker_signature: String,
        }
        set {
            poll_interval_ms: u64,
            grace_period_ms: u64,
            log_tail_lines: usize,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    /// Overlay `MJ_SCRIPT`, `MJ_POLL_INTERVAL_MS` and `MJ_GRACE_PERIOD_MS`.
    pub fn apply_env(mut self) -> Self {
        if let Some(script) = crate::env::script() {
            self.script = script;
        }
        if let Some(poll) = crate::env::poll_interval() {
            self.poll_interval_ms = poll.as_millis() as u64;
        }
        if let Some(grace) = crate::env::grace_period() {
            self.grace_period_ms = grace.as_millis() as u64;
        }
        self
    }
}

/// Contents of `mj.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub manager: ManagerSettings,
    /// Launch configuration used when a request does not override it.
    pub defaults: LaunchConfig,
}

impl Config {
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::parse(path, &content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                tracing::debug!(path = %path.display(), "config file absent, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment overrides to both sections.
    pub fn apply_env(mut self) -> Self {
        self.manager = self.manager.apply_env();
        if let Some(key) = crate::env::entitlement_key() {
            self.defaults.entitlement_key = Some(key);
        }
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
