// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launch requests and the configuration bundle passed to the script.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_HOME_DIR: &str = "/opt/cp4i";
pub const DEFAULT_FINAL_REGISTRY: &str = "registry.example.com:5000";
pub const DEFAULT_REGISTRY_AUTH_FILE: &str = "/root/.docker/config.json";

/// Environment the script runs against. Echoed back on every job record so
/// a retry can reuse it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    pub home_dir: PathBuf,
    pub final_registry: String,
    pub registry_auth_file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entitlement_key: Option<String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            home_dir: PathBuf::from(DEFAULT_HOME_DIR),
            final_registry: DEFAULT_FINAL_REGISTRY.to_string(),
            registry_auth_file: PathBuf::from(DEFAULT_REGISTRY_AUTH_FILE),
            entitlement_key: None,
        }
    }
}

impl LaunchConfig {
    crate::setters! {
        into {
            home_dir: PathBuf,
            final_registry: String,
            registry_auth_file: PathBuf,
        }
        option {
            entitlement_key: String,
        }
    }

    /// Apply caller overrides on top of this config.
    pub fn merged(&self, overrides: &LaunchOverrides) -> Self {
        Self {
            home_dir: overrides.home_dir.clone().unwrap_or_else(|| self.home_dir.clone()),
            final_registry: overrides
                .final_registry
                .clone()
                .unwrap_or_else(|| self.final_registry.clone()),
            registry_auth_file: overrides
                .registry_auth_file
                .clone()
                .unwrap_or_else(|| self.registry_auth_file.clone()),
            entitlement_key: overrides
                .entitlement_key
                .clone()
                .or_else(|| self.entitlement_key.clone()),
        }
    }

    /// `<home>/<name>`: the script's working directory for a job.
    pub fn job_dir(&self, name: &str) -> PathBuf {
        job_dir(&self.home_dir, name)
    }

    pub fn log_path(&self, name: &str) -> PathBuf {
        log_path(&self.home_dir, name)
    }

    pub fn report_path(&self, name: &str) -> PathBuf {
        report_path(&self.home_dir, name)
    }
}

/// Optional replacements for [`LaunchConfig`] fields, used by retry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchOverrides {
    pub home_dir: Option<PathBuf>,
    pub final_registry: Option<String>,
    pub registry_auth_file: Option<PathBuf>,
    pub entitlement_key: Option<String>,
}

impl LaunchOverrides {
    crate::setters! {
        option {
            home_dir: PathBuf,
            final_registry: String,
            registry_auth_file: PathBuf,
            entitlement_key: String,
        }
    }
}

/// What to mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRequest {
    pub component: String,
    pub version: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
}

impl LaunchRequest {
    pub fn new(
        component: impl Into<String>,
        version: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            version: version.into(),
            name: name.into(),
            filter: None,
            dry_run: false,
        }
    }

    crate::setters! {
        set {
            dry_run: bool,
        }
        option {
            filter: String,
        }
    }
}

pub fn job_dir(home: &Path, name: &str) -> PathBuf {
    home.join(name)
}

/// `<home>/<name>/<name>-download.log`
pub fn log_path(home: &Path, name: &str) -> PathBuf {
    job_dir(home, name).join(format!("{name}-download.log"))
}

/// `<home>/<name>-summary-report.txt`
pub fn report_path(home: &Path, name: &str) -> PathBuf {
    home.join(format!("{name}-summary-report.txt"))
}

#[cfg(test)]
#[path = "launch_tests.rs"]
mod tests;
