// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors returned by the download manager boundary.

use mj_core::JobId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that fail a manager request
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("job already tracked: {0}")]
    DuplicateJob(JobId),
    #[error("job not found: {0}")]
    NotFound(String),
    #[error("job {id} is not running (status: {status})")]
    NotRunning { id: JobId, status: mj_core::JobStatus },
    #[error("file not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
