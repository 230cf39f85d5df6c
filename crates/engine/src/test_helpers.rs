// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixtures shared by engine tests.

use crate::config::ManagerSettings;
use std::path::{Path, PathBuf};

/// Write a shell script into `dir` and return its path.
pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    path
}

/// Settings running `script` under `sh` with fast polling.
pub(crate) fn fast_settings(script: &Path) -> ManagerSettings {
    ManagerSettings::default()
        .script(script)
        .interpreter("sh")
        .poll_interval_ms(20)
        .grace_period_ms(100)
}

/// Poll `check` until it returns true or `timeout` elapses.
pub(crate) async fn wait_until<F>(timeout: std::time::Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    check()
}
