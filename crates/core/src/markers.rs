// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log markers written by the mirroring script.
//!
//! All matching is case-insensitive. Success and failure are decided by the
//! last non-blank line only; a marker followed by trailing output (for
//! example a shell prompt or cleanup message) is not recognised.

use regex::Regex;
use std::sync::LazyLock;

/// Last line of a successful run.
pub const SUCCESS_MARKER: &str = "info: mirroring completed";

/// Last line of a failed run.
pub const FAILURE_MARKER: &str = "error: one or more errors occurred";

/// Present anywhere in the log of a dry run.
pub const DRY_RUN_MARKER: &str = "[dry run]";

/// `Image mirroring started for <name> (PID: <n>)`
#[allow(clippy::expect_used)]
static MIRROR_PID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Image mirroring started.*\(PID:\s*(\d+)\)")
        .expect("constant regex pattern is valid")
});

/// Outcome announced by the log, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogVerdict {
    Completed,
    Failed,
    /// No terminal marker on the last line.
    Pending,
}

crate::simple_display! {
    LogVerdict {
        Completed => "completed",
        Failed => "failed",
        Pending => "pending",
    }
}

/// Last line of `content` that is not empty after trimming.
pub fn last_non_blank_line(content: &str) -> Option<&str> {
    content.lines().rev().map(str::trim).find(|line| !line.is_empty())
}

/// Classify a single line. Failure wins when both markers are present.
pub fn classify_line(line: &str) -> LogVerdict {
    let lower = line.to_lowercase();
    if lower.contains(FAILURE_MARKER) {
        LogVerdict::Failed
    } else if lower.contains(SUCCESS_MARKER) {
        LogVerdict::Completed
    } else {
        LogVerdict::Pending
    }
}

/// Classify a whole log by its last non-blank line.
pub fn classify_log(content: &str) -> LogVerdict {
    last_non_blank_line(content).map_or(LogVerdict::Pending, classify_line)
}

pub fn mentions_dry_run(content: &str) -> bool {
    content.to_lowercase().contains(DRY_RUN_MARKER)
}

/// First mirror worker pid announced in the log.
pub fn find_mirror_pid(content: &str) -> Option<u32> {
    MIRROR_PID.captures(content).and_then(|caps| caps.get(1)).and_then(|m| m.as_str().parse().ok())
}

/// Lines mentioning an error or failure, taken from the last `window`
/// lines of `content` and capped at `limit`.
pub fn error_excerpt(content: &str, window: usize, limit: usize) -> Vec<String> {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(window);
    lines[start..]
        .iter()
        .filter(|line| {
            let lower = line.to_lowercase();
            lower.contains("error") || lower.contains("fail")
        })
        .take(limit)
        .map(|line| line.trim_end().to_string())
        .collect()
}

#[cfg(test)]
#[path = "markers_tests.rs"]
mod tests;
