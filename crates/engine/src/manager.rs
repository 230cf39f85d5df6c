// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Download manager: the operator-facing boundary.
//!
//! Owns the registry, the launcher and one monitor task per active job.

use crate::config::ManagerSettings;
use crate::error::ManagerError;
use crate::launcher::{LaunchMode, Launcher};
use crate::log_tail;
use crate::monitor::{Monitor, MonitorOutcome};
use crate::registry::{JobRegistry, Retirement};
use crate::terminate::{self, KillAttempt};
use mj_core::{
    Clock, HistoryEntry, JobId, JobRecord, JobStatus, LaunchConfig, LaunchOverrides,
    LaunchRequest, SystemClock,
};
use nix::sys::signal::Signal;
use parking_lot::Mutex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A job that was just launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartedJob {
    pub id: JobId,
    pub pid: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobListing {
    pub active: Vec<JobRecord>,
    pub history: Vec<HistoryEntry>,
}

/// An active job with the tail of its log.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub record: JobRecord,
    /// Mirror worker pid when known, otherwise the script pid.
    pub pid: u32,
    pub log_tail: Vec<String>,
}

/// Outcome of a dismiss request.
#[derive(Debug, Clone, Serialize)]
pub struct Dismissal {
    pub record: JobRecord,
    pub kills: Vec<KillAttempt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    /// Monitors that finished within the timeout.
    pub finished: usize,
    /// Monitors aborted when the timeout expired.
    pub aborted: usize,
}

pub struct DownloadManager<C: Clock = SystemClock> {
    registry: Arc<JobRegistry>,
    launcher: Launcher,
    settings: ManagerSettings,
    defaults: LaunchConfig,
    clock: C,
    monitors: Mutex<Vec<(JobId, JoinHandle<MonitorOutcome>)>>,
}

impl DownloadManager<SystemClock> {
    pub fn new(settings: ManagerSettings, defaults: LaunchConfig) -> Self {
        Self::with_clock(settings, defaults, SystemClock)
    }
}

impl<C: Clock> DownloadManager<C> {
    pub fn with_clock(settings: ManagerSettings, defaults: LaunchConfig, clock: C) -> Self {
        Self {
            registry: Arc::new(JobRegistry::new()),
            launcher: Launcher::new(settings.interpreter.clone(), settings.script.clone()),
            settings,
            defaults,
            clock,
            monitors: Mutex::new(Vec::new()),
        }
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Launch the script for `request` and start monitoring it.
    pub async fn start(
        &self,
        request: &LaunchRequest,
        overrides: &LaunchOverrides,
    ) -> Result<StartedJob, ManagerError> {
        let config = self.defaults.merged(overrides);
        self.launch(request, &config, LaunchMode::Fresh)
    }

    /// Launch `request` with `--retry` when no earlier attempt is tracked in
    /// this process. Same-named records are still superseded.
    pub async fn start_retry(
        &self,
        request: &LaunchRequest,
        overrides: &LaunchOverrides,
    ) -> Result<StartedJob, ManagerError> {
        let config = self.defaults.merged(overrides);
        let request = request.clone().dry_run(false);
        self.launch(&request, &config, LaunchMode::Retry)
    }

    fn launch(
        &self,
        request: &LaunchRequest,
        config: &LaunchConfig,
        mode: LaunchMode,
    ) -> Result<StartedJob, ManagerError> {
        let process = self.launcher.spawn(request, config, mode)?;
        let pid = process.pid();
        let now = self.clock.now();
        let base = match mode {
            LaunchMode::Fresh => JobId::for_launch(&request.name, now.timestamp()),
            LaunchMode::Retry => JobId::for_retry(&request.name, now.timestamp()),
        };

        if mode == LaunchMode::Retry {
            let (active, history) = self.registry.purge_name(&request.name);
            tracing::info!(name = %request.name, active, history, "superseded prior attempts");
        }
        let record =
            self.registry.insert_fresh(base, |id| JobRecord::new(id, request, config, pid, now));
        let id = record.id.clone();

        let monitor =
            Monitor::new(&record, process, Arc::clone(&self.registry), self.clock.clone(), &self.settings);
        let handle = tokio::spawn(monitor.run());
        {
            let mut monitors = self.monitors.lock();
            monitors.retain(|(_, handle)| !handle.is_finished());
            monitors.push((id.clone(), handle));
        }

        tracing::info!(job_id = %id, pid, "job started");
        Ok(StartedJob { id, pid })
    }

    pub fn list(&self) -> JobListing {
        JobListing { active: self.registry.active(), history: self.registry.history() }
    }

    /// Active job with the tail of its log.
    pub fn get(&self, id: &str) -> Result<JobDetail, ManagerError> {
        let record = self.registry.get(id).ok_or_else(|| ManagerError::NotFound(id.to_string()))?;
        let log_tail = log_tail::tail_lines(&record.log_file, self.settings.log_tail_lines);
        Ok(JobDetail { pid: record.display_pid(), record, log_tail })
    }

    /// Latest history entry for a retired job.
    pub fn history_entry(&self, id: &str) -> Option<HistoryEntry> {
        self.registry.history_entry(id)
    }

    /// Retire the job as stopped and send SIGTERM to the script.
    ///
    /// The status changes before the signal is sent, so the monitor never
    /// sees the resulting exit as a failure.
    pub async fn stop(&self, id: &str) -> Result<JobRecord, ManagerError> {
        let record = match self.registry.retire(id, JobStatus::Stopped, self.clock.now()) {
            Retirement::Retired(record) => record,
            Retirement::AlreadyTerminal(record) => {
                return Err(ManagerError::NotRunning { id: record.id, status: record.status });
            }
            Retirement::Missing => return Err(ManagerError::NotFound(id.to_string())),
        };

        match terminate::send_signal(record.main_pid, Signal::SIGTERM) {
            Ok(true) => tracing::info!(job_id = %record.id, pid = record.main_pid, "sent SIGTERM"),
            Ok(false) => {
                tracing::debug!(job_id = %record.id, pid = record.main_pid, "script already gone")
            }
            Err(e) => {
                tracing::warn!(job_id = %record.id, pid = record.main_pid, error = %e, "SIGTERM failed")
            }
        }

        self.publish_report(&record).await;
        Ok(record)
    }

    /// Retire the job as dismissed, kill its whole process tree and drop
    /// it from the active map.
    ///
    /// Like [`stop`](Self::stop), the status changes before any signal is
    /// sent so the monitor cannot record the killed script as failed.
    pub async fn dismiss(&self, id: &str) -> Result<Dismissal, ManagerError> {
        let (record, retired) = match self.registry.retire(id, JobStatus::Dismissed, self.clock.now()) {
            Retirement::Retired(record) => (record, true),
            Retirement::AlreadyTerminal(record) => (record, false),
            Retirement::Missing => return Err(ManagerError::NotFound(id.to_string())),
        };

        let signature = self.settings.worker_signature.clone();
        let target = record.clone();
        let kills = tokio::task::spawn_blocking(move || terminate::kill_job_tree(&target, &signature))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(job_id = %record.id, error = %e, "kill task failed");
                Vec::new()
            });
        self.registry.remove_owned(id, record.main_pid);

        if !retired {
            tracing::info!(job_id = %record.id, status = %record.status, "dismissed retired job");
            return Ok(Dismissal { record, kills, report: None });
        }
        tracing::info!(job_id = %record.id, "job dismissed");
        let report = self.publish_report(&record).await;
        Ok(Dismissal { record, kills, report })
    }

    /// Relaunch a job with `--retry`, superseding every earlier attempt
    /// with the same name.
    pub async fn retry(
        &self,
        id: &str,
        overrides: &LaunchOverrides,
    ) -> Result<StartedJob, ManagerError> {
        let prior = self.registry.find(id).ok_or_else(|| ManagerError::NotFound(id.to_string()))?;
        let stored = LaunchConfig {
            home_dir: prior.home_dir.clone(),
            final_registry: prior.final_registry.clone(),
            registry_auth_file: prior.registry_auth_file.clone(),
            entitlement_key: prior.entitlement_key.clone(),
        };
        let config = stored.merged(overrides);
        let mut request = LaunchRequest::new(prior.component, prior.version, prior.name);
        request.filter = prior.filter;

        tracing::info!(prior = %prior.id, name = %request.name, "retrying job");
        self.launch(&request, &config, LaunchMode::Retry)
    }

    /// Full content of `<home>/<name>/<name>-download.log`.
    pub fn read_log(&self, home: &Path, name: &str) -> Result<String, ManagerError> {
        read_artifact(&mj_core::launch::log_path(home, name))
    }

    /// Full content of `<home>/<name>-summary-report.txt`.
    pub fn read_report(&self, home: &Path, name: &str) -> Result<String, ManagerError> {
        read_artifact(&mj_core::launch::report_path(home, name))
    }

    /// Wait for monitors to finish, aborting any still running after
    /// `timeout`.
    pub async fn drain(&self, timeout: Duration) -> DrainSummary {
        let monitors = std::mem::take(&mut *self.monitors.lock());
        let deadline = tokio::time::Instant::now() + timeout;
        let mut summary = DrainSummary::default();

        for (id, mut handle) in monitors {
            match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(Ok(outcome)) => {
                    tracing::debug!(job_id = %id, ?outcome, "monitor finished");
                    summary.finished += 1;
                }
                Ok(Err(e)) => {
                    tracing::warn!(job_id = %id, error = %e, "monitor task failed");
                    summary.finished += 1;
                }
                Err(_) => {
                    handle.abort();
                    tracing::warn!(job_id = %id, "monitor aborted at shutdown");
                    summary.aborted += 1;
                }
            }
        }
        summary
    }

    async fn publish_report(&self, record: &JobRecord) -> Option<PathBuf> {
        let record = record.clone();
        let generated_at = self.clock.now();
        tokio::task::spawn_blocking(move || crate::report::publish(&record, generated_at))
            .await
            .ok()
            .flatten()
    }
}

fn read_artifact(path: &Path) -> Result<String, ManagerError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ManagerError::ArtifactNotFound(path.to_path_buf()))
        }
        Err(source) => Err(ManagerError::Read { path: path.to_path_buf(), source }),
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
