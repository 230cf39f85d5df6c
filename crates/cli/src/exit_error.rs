// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to flush logs and drain monitors first.

use mj_core::JobStatus;
use std::fmt;

/// Exit code used when the operator interrupts a followed job.
pub const INTERRUPTED: i32 = 130;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Exit for a job that retired with `status`, or `None` when it completed.
    pub fn for_status(id: &str, status: JobStatus) -> Option<Self> {
        match status {
            JobStatus::Completed => None,
            JobStatus::Dismissed => {
                Some(Self::new(INTERRUPTED, format!("job {id} was dismissed")))
            }
            other => Some(Self::new(1, format!("job {id} finished {other}"))),
        }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
