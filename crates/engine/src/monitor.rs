// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job supervision loop.
//!
//! Each active job has one monitor task. It polls the script process and
//! its log on a fixed cadence, drives the job to a terminal status, writes
//! the summary report, and removes the job from the registry once the
//! grace period has passed.

use crate::config::ManagerSettings;
use crate::launcher::ProcessHandle;
use crate::log_tail;
use crate::registry::{JobRegistry, Retirement};
use mj_core::markers::{self, LogVerdict};
use mj_core::{Clock, JobId, JobRecord, JobStatus};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// How a monitor's supervision ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// The monitor drove the job to this terminal status.
    Concluded(JobStatus),
    /// An operator retired the job first (stop or dismiss).
    Retired(JobStatus),
    /// The job left the registry before the monitor concluded it.
    Vanished,
}

/// Status of a job whose process has exited.
///
/// A marker on the last line wins. Without one, a dry run that exited
/// cleanly or any clean exit is a success; a non-zero exit is a failure.
pub fn resolve_after_exit(verdict: LogVerdict, dry_run_in_log: bool, exit_code: i32) -> JobStatus {
    match verdict {
        LogVerdict::Failed => JobStatus::Failed,
        LogVerdict::Completed => JobStatus::Completed,
        LogVerdict::Pending if dry_run_in_log && exit_code == 0 => JobStatus::Completed,
        LogVerdict::Pending if exit_code == 0 => JobStatus::Completed,
        LogVerdict::Pending => JobStatus::Failed,
    }
}

/// What one tick read from the log.
#[derive(Debug, Default)]
struct LogObservation {
    grew: bool,
    verdict: Option<LogVerdict>,
    mirror_pid: Option<u32>,
    dry_run: bool,
}

pub struct Monitor<C: Clock> {
    id: JobId,
    main_pid: u32,
    log_file: PathBuf,
    registry: Arc<JobRegistry>,
    process: ProcessHandle,
    clock: C,
    poll_interval: Duration,
    grace_period: Duration,
    last_log_size: u64,
}

impl<C: Clock> Monitor<C> {
    pub fn new(
        record: &JobRecord,
        process: ProcessHandle,
        registry: Arc<JobRegistry>,
        clock: C,
        settings: &ManagerSettings,
    ) -> Self {
        Self {
            id: record.id.clone(),
            main_pid: record.main_pid,
            log_file: record.log_file.clone(),
            registry,
            process,
            clock,
            poll_interval: settings.poll_interval(),
            grace_period: settings.grace_period(),
            last_log_size: 0,
        }
    }

    /// Supervise the job until it retires, then remove it after the grace
    /// period.
    pub async fn run(mut self) -> MonitorOutcome {
        let outcome = self.supervise().await;

        // Reap the child if it exits within the grace period.
        let (code, ()) = tokio::join!(
            self.process.wait_timeout(self.grace_period),
            tokio::time::sleep(self.grace_period)
        );
        if let Some(code) = code {
            self.registry.update(self.id.as_str(), |r| r.record_return_code(code));
        }

        if self.registry.remove_owned(self.id.as_str(), self.main_pid).is_some() {
            tracing::info!(job_id = %self.id, "job removed from active registry");
        }
        outcome
    }

    async fn supervise(&mut self) -> MonitorOutcome {
        tracing::info!(job_id = %self.id, log = %self.log_file.display(), "monitoring started");
        loop {
            match self.registry.status(self.id.as_str()) {
                None => {
                    tracing::debug!(job_id = %self.id, "job left registry, monitor exiting");
                    return MonitorOutcome::Vanished;
                }
                Some(status) if status.is_terminal() => {
                    tracing::debug!(job_id = %self.id, %status, "job retired externally, monitor exiting");
                    return MonitorOutcome::Retired(status);
                }
                Some(_) => {}
            }

            if let Some(status) = self.tick().await {
                return self.conclude(status).await;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One poll of the process and log. Returns the terminal status when
    /// the job has reached one.
    async fn tick(&mut self) -> Option<JobStatus> {
        let exit_code = self.process.try_wait();
        if let Some(code) = exit_code {
            tracing::info!(job_id = %self.id, exit_code = code, "mirror script exited");
            self.registry.update(self.id.as_str(), |r| r.record_return_code(code));
        }

        let observation = self.observe_log().await;
        self.apply(&observation);
        let verdict = observation.verdict.unwrap_or(LogVerdict::Pending);

        match exit_code {
            Some(code) => Some(resolve_after_exit(verdict, observation.dry_run, code)),
            None => match verdict {
                LogVerdict::Completed => Some(JobStatus::Completed),
                LogVerdict::Failed => Some(JobStatus::Failed),
                LogVerdict::Pending => None,
            },
        }
    }

    /// Read the whole log. A failed read leaves the record untouched and
    /// is retried on the next tick.
    async fn observe_log(&mut self) -> LogObservation {
        let path = self.log_file.clone();
        let content = match tokio::task::spawn_blocking(move || log_tail::read_all(&path)).await {
            Ok(Ok(content)) => content,
            Ok(Err(e)) => {
                tracing::debug!(job_id = %self.id, error = %e, "log read failed, retrying next tick");
                return LogObservation::default();
            }
            Err(e) => {
                tracing::warn!(job_id = %self.id, error = %e, "log read task failed");
                return LogObservation::default();
            }
        };

        let size = content.len() as u64;
        let grew = size > self.last_log_size;
        self.last_log_size = size;
        LogObservation {
            grew,
            verdict: Some(markers::classify_log(&content)),
            mirror_pid: markers::find_mirror_pid(&content),
            dry_run: markers::mentions_dry_run(&content),
        }
    }

    fn apply(&self, observation: &LogObservation) {
        let id = &self.id;
        self.registry.update(id.as_str(), |record| {
            if let Some(pid) = observation.mirror_pid {
                if record.assign_mirror_pid(pid) {
                    tracing::info!(job_id = %id, mirror_pid = pid, "mirror worker pid captured");
                }
            }
            if observation.grew && record.record_log_growth() {
                tracing::debug!(job_id = %id, progress = record.progress, "log growing");
            }
        });
    }

    async fn conclude(&self, status: JobStatus) -> MonitorOutcome {
        match self.registry.retire(self.id.as_str(), status, self.clock.now()) {
            Retirement::Retired(record) => {
                tracing::info!(
                    job_id = %self.id,
                    %status,
                    return_code = ?record.return_code,
                    "job retired"
                );
                let generated_at = self.clock.now();
                let report = tokio::task::spawn_blocking(move || {
                    crate::report::publish(&record, generated_at)
                })
                .await;
                if let Err(e) = report {
                    tracing::warn!(job_id = %self.id, error = %e, "report task failed");
                }
                MonitorOutcome::Concluded(status)
            }
            Retirement::AlreadyTerminal(record) => MonitorOutcome::Retired(record.status),
            Retirement::Missing => MonitorOutcome::Vanished,
        }
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
