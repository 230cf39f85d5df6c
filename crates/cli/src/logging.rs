// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup: stderr always, plus an append-only supervisor log under
//! the download home when it is writable.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Directory under the download home holding supervisor state.
pub const STATE_DIR: &str = ".mj";
pub const LOG_FILE: &str = "supervisor.log";

/// Supervisor log location for a download home.
pub fn log_path(home: &Path) -> PathBuf {
    home.join(STATE_DIR).join(LOG_FILE)
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env("MJ_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. The returned guard flushes the file
/// layer on drop and must outlive the command.
pub fn init(home: Option<&Path>) -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let Some(path) = home.map(log_path) else {
        let _ = tracing_subscriber::registry().with(filter()).with(stderr_layer).try_init();
        return None;
    };

    match open_log(&path) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
            let result = tracing_subscriber::registry()
                .with(filter())
                .with(stderr_layer)
                .with(file_layer)
                .try_init();
            if result.is_ok() {
                tracing::debug!(path = %path.display(), "supervisor log opened");
            }
            Some(guard)
        }
        Err(e) => {
            let result = tracing_subscriber::registry().with(filter()).with(stderr_layer).try_init();
            if result.is_ok() {
                tracing::warn!(path = %path.display(), error = %e, "supervisor log unavailable, stderr only");
            }
            None
        }
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
