// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mirror job records and their lifecycle state machine.
//!
//! A [`JobRecord`] is created when the launcher has spawned the script and
//! is mutated only through the methods here, which enforce the lifecycle
//! invariants: status moves monotonically toward a terminal state, progress
//! never decreases, and the mirror pid is assigned at most once.

use crate::id::JobId;
use crate::launch::{LaunchConfig, LaunchRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Progress ceiling while the job is still running.
pub const PROGRESS_CEILING: u8 = 95;

/// Progress gained each time the log grows between polls.
pub const PROGRESS_STEP: u8 = 5;

/// Lifecycle status of a mirror job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Spawned; the log has not grown yet.
    Running,
    /// The log has grown at least once.
    Progressing,
    Completed,
    Failed,
    /// Terminated by an operator with SIGTERM.
    Stopped,
    /// Force-killed by an operator.
    Dismissed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Stopped | Self::Dismissed)
    }
}

crate::simple_display! {
    JobStatus {
        Running => "running",
        Progressing => "progressing",
        Completed => "completed",
        Failed => "failed",
        Stopped => "stopped",
        Dismissed => "dismissed",
    }
}

/// Externally-visible state of one tracked job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub component: String,
    pub version: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
    pub status: JobStatus,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub main_pid: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_pid: Option<u32>,
    pub progress: u8,
    pub log_file: PathBuf,
    pub home_dir: PathBuf,
    pub final_registry: String,
    pub registry_auth_file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entitlement_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_code: Option<i32>,
}

impl JobRecord {
    /// Record for a freshly spawned process.
    pub fn new(
        id: JobId,
        request: &LaunchRequest,
        config: &LaunchConfig,
        main_pid: u32,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            component: request.component.clone(),
            version: request.version.clone(),
            name: request.name.clone(),
            filter: request.filter.clone(),
            dry_run: request.dry_run,
            status: JobStatus::Running,
            start_time,
            end_time: None,
            main_pid,
            mirror_pid: None,
            progress: 0,
            log_file: config.log_path(&request.name),
            home_dir: config.home_dir.clone(),
            final_registry: config.final_registry.clone(),
            registry_auth_file: config.registry_auth_file.clone(),
            entitlement_key: config.entitlement_key.clone(),
            return_code: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Pid shown to operators: the mirror worker when known.
    pub fn display_pid(&self) -> u32 {
        self.mirror_pid.unwrap_or(self.main_pid)
    }

    /// The log grew since the last poll.
    ///
    /// Bumps progress by [`PROGRESS_STEP`] up to [`PROGRESS_CEILING`] and
    /// marks the job as progressing. Returns false (no change) once the job
    /// is terminal.
    pub fn record_log_growth(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        let bumped = self.progress.saturating_add(PROGRESS_STEP).min(PROGRESS_CEILING);
        self.progress = self.progress.max(bumped);
        self.status = JobStatus::Progressing;
        true
    }

    /// Assign the mirror worker pid. Only the first assignment sticks.
    pub fn assign_mirror_pid(&mut self, pid: u32) -> bool {
        if self.mirror_pid.is_some() {
            return false;
        }
        self.mirror_pid = Some(pid);
        true
    }

    /// Record the process exit code if one was not already captured.
    pub fn record_return_code(&mut self, code: i32) {
        if self.return_code.is_none() {
            self.return_code = Some(code);
        }
    }

    /// Transition into a terminal status.
    ///
    /// Returns false, leaving the record untouched, when the job is already
    /// terminal or `status` is not a terminal status.
    pub fn finish(&mut self, status: JobStatus, at: DateTime<Utc>) -> bool {
        if self.is_terminal() || !status.is_terminal() {
            return false;
        }
        self.status = status;
        self.end_time = Some(at);
        if status == JobStatus::Completed {
            self.progress = 100;
        }
        true
    }

    /// Wall-clock duration from start to end (or to `now` while active).
    pub fn elapsed(&self, now: DateTime<Utc>) -> chrono::Duration {
        let end = self.end_time.unwrap_or(now);
        (end - self.start_time).max(chrono::Duration::zero())
    }
}

/// Read-only snapshot of a retired job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntry(JobRecord);

impl HistoryEntry {
    pub fn record(&self) -> &JobRecord {
        &self.0
    }

    pub fn into_record(self) -> JobRecord {
        self.0
    }
}

impl From<JobRecord> for HistoryEntry {
    fn from(record: JobRecord) -> Self {
        Self(record)
    }
}

impl std::ops::Deref for HistoryEntry {
    type Target = JobRecord;

    fn deref(&self) -> &JobRecord {
        &self.0
    }
}

crate::builder! {
    pub struct JobRecordBuilder => JobRecord {
        into {
            id: JobId = "mq-1700000000",
            component: String = "ibm-mq",
            version: String = "9.3.5",
            name: String = "mq",
            log_file: PathBuf = "/opt/cp4i/mq/mq-download.log",
            home_dir: PathBuf = "/opt/cp4i",
            final_registry: String = "registry.example.com:5000",
            registry_auth_file: PathBuf = "/root/.docker/config.json",
        }
        set {
            dry_run: bool = false,
            status: JobStatus = JobStatus::Running,
            start_time: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH,
            main_pid: u32 = 4242,
            progress: u8 = 0,
        }
        option {
            filter: String = None,
            end_time: DateTime<Utc> = None,
            mirror_pid: u32 = None,
            entitlement_key: String = None,
            return_code: i32 = None,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
