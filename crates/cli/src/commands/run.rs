// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mj run` / `mj retry` - launch a mirroring job and follow it to retirement

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use mj_core::{Clock, JobId, JobRecord, JobStatus, LaunchOverrides, LaunchRequest};
use mj_engine::{Config, DownloadManager, ManagerError};

use crate::exit_error::ExitError;
use crate::output::{print_or_json, progress_line, summary_text, OutputFormat};

const FOLLOW_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Args, Debug, Clone)]
pub struct JobArgs {
    /// Product component passed to the script (e.g. "ibm-mq")
    #[arg(long)]
    pub component: String,

    /// Component version
    #[arg(long = "version")]
    pub component_version: String,

    /// Job name; also names the job directory under the home dir
    #[arg(long)]
    pub name: String,

    /// Image filter passed through to the script
    #[arg(long)]
    pub filter: Option<String>,

    /// Download home directory
    #[arg(long)]
    pub home_dir: Option<PathBuf>,

    /// Destination registry
    #[arg(long)]
    pub registry: Option<String>,

    /// Registry credentials file
    #[arg(long)]
    pub auth_file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

impl JobArgs {
    pub fn request(&self, dry_run: bool) -> LaunchRequest {
        let mut request =
            LaunchRequest::new(&self.component, &self.component_version, &self.name)
                .dry_run(dry_run);
        request.filter = self.filter.clone();
        request
    }

    pub fn overrides(&self) -> LaunchOverrides {
        LaunchOverrides {
            home_dir: self.home_dir.clone(),
            final_registry: self.registry.clone(),
            registry_auth_file: self.auth_file.clone(),
            entitlement_key: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    Fresh { dry_run: bool },
    Retry,
}

pub async fn handle(config: Config, args: &JobArgs, mode: RunMode) -> Result<()> {
    let manager = DownloadManager::new(config.manager, config.defaults);
    let overrides = args.overrides();
    let started = match mode {
        RunMode::Fresh { dry_run } => manager.start(&args.request(dry_run), &overrides).await?,
        RunMode::Retry => manager.start_retry(&args.request(false), &overrides).await?,
    };
    if args.output == OutputFormat::Text {
        println!("Started {} (pid {})", started.id, started.pid);
    }

    let followed = follow(&manager, &started.id, args.output).await;
    let drained = manager.drain(mj_engine::env::drain_timeout()).await;
    tracing::debug!(finished = drained.finished, aborted = drained.aborted, "monitors drained");

    let record = followed?;
    print_or_json(args.output, &record, || summary_text(&record))?;
    match ExitError::for_status(record.id.as_str(), record.status) {
        Some(exit) => Err(exit.into()),
        None => Ok(()),
    }
}

/// Poll the job until it retires, printing status and progress changes.
/// Ctrl-C dismisses the job.
async fn follow<C: Clock>(
    manager: &DownloadManager<C>,
    id: &JobId,
    format: OutputFormat,
) -> Result<JobRecord> {
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);
    let mut last: Option<(JobStatus, u8)> = None;

    loop {
        tokio::select! {
            _ = &mut interrupt => return interrupted(manager, id).await,
            _ = tokio::time::sleep(FOLLOW_INTERVAL) => {}
        }

        if let Some(entry) = manager.history_entry(id.as_str()) {
            return Ok(entry.into_record());
        }
        match manager.get(id.as_str()) {
            Ok(detail) => {
                let seen = (detail.record.status, detail.record.progress);
                if format == OutputFormat::Text && last != Some(seen) {
                    println!("{}", progress_line(&detail.record));
                }
                last = Some(seen);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

async fn interrupted<C: Clock>(manager: &DownloadManager<C>, id: &JobId) -> Result<JobRecord> {
    tracing::info!(job_id = %id, "interrupted, dismissing job");
    match manager.dismiss(id.as_str()).await {
        Ok(dismissal) => Ok(dismissal.record),
        Err(ManagerError::NotFound(_)) => manager
            .history_entry(id.as_str())
            .map(|entry| entry.into_record())
            .ok_or_else(|| ManagerError::NotFound(id.to_string()).into()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
