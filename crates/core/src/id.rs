// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifiers.
//!
//! Ids are derived from the logical job name and the launch time
//! (`<name>-<secs>` or `<name>-retry-<secs>`), so they stay readable in
//! logs and report listings.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Unique identifier for a tracked job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(SmolStr);

impl JobId {
    /// Create an id from an existing string (caller-supplied or parsed).
    pub fn from_string(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    /// Id for a fresh launch of `name` at `epoch_secs`.
    pub fn for_launch(name: &str, epoch_secs: i64) -> Self {
        Self(SmolStr::new(format!("{name}-{epoch_secs}")))
    }

    /// Id for a retry of `name` at `epoch_secs`.
    pub fn for_retry(name: &str, epoch_secs: i64) -> Self {
        Self(SmolStr::new(format!("{name}-retry-{epoch_secs}")))
    }

    /// Derive a disambiguated id (`<id>-<n>`) used when `self` is taken.
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(SmolStr::new(format!("{}-{n}", self.0)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for JobId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for JobId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::borrow::Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
