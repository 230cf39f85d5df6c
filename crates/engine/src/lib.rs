// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mj-engine: launches mirroring scripts and supervises them to retirement

pub mod config;
pub mod env;
mod error;
pub mod launcher;
pub mod log_tail;
mod manager;
pub mod monitor;
pub mod registry;
pub mod report;
pub mod terminate;

#[cfg(test)]
mod test_helpers;

pub use config::{Config, ConfigError, ManagerSettings};
pub use error::ManagerError;
pub use launcher::{LaunchMode, Launcher, ProcessHandle};
pub use manager::{Dismissal, DownloadManager, DrainSummary, JobDetail, JobListing, StartedJob};
pub use monitor::{Monitor, MonitorOutcome};
pub use registry::{JobRegistry, Retirement};
pub use report::{ReportError, ReportStats};
pub use terminate::{KillAttempt, KillResult, KillTarget};
