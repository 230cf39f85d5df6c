// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Summary reports written when a job retires.

pub mod render;
pub mod stats;

pub use render::{format_bytes, format_duration};
pub use stats::ReportStats;

use chrono::{DateTime, Utc};
use mj_core::JobRecord;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Gather statistics for `record` and write `<home>/<name>-summary-report.txt`.
pub fn write_report(record: &JobRecord, generated_at: DateTime<Utc>) -> Result<PathBuf, ReportError> {
    let path = mj_core::launch::report_path(&record.home_dir, &record.name);
    let stats = ReportStats::collect(record);
    let content = render::render(record, &stats, generated_at);

    std::fs::create_dir_all(&record.home_dir)
        .and_then(|()| std::fs::write(&path, content))
        .map_err(|source| ReportError::Write { path: path.clone(), source })?;
    Ok(path)
}

/// Write the report and log the outcome. Failures never propagate.
pub fn publish(record: &JobRecord, generated_at: DateTime<Utc>) -> Option<PathBuf> {
    match write_report(record, generated_at) {
        Ok(path) => {
            tracing::info!(job_id = %record.id, status = %record.status, path = %path.display(), "summary report written");
            Some(path)
        }
        Err(e) => {
            tracing::warn!(job_id = %record.id, status = %record.status, error = %e, "summary report failed");
            None
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
