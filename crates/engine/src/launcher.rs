// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawning the mirroring script.

use crate::error::ManagerError;
use mj_core::{LaunchConfig, LaunchRequest};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};

/// Whether a launch is a first attempt or a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Fresh,
    Retry,
}

/// Starts the script under an interpreter.
#[derive(Debug, Clone)]
pub struct Launcher {
    interpreter: String,
    script: PathBuf,
}

impl Launcher {
    pub fn new(interpreter: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self { interpreter: interpreter.into(), script: script.into() }
    }

    /// Arguments passed after the interpreter.
    pub fn command_args(&self, request: &LaunchRequest, mode: LaunchMode) -> Vec<String> {
        let mut args = vec![
            self.script.display().to_string(),
            "--component".to_string(),
            request.component.clone(),
            "--version".to_string(),
            request.version.clone(),
            "--name".to_string(),
            request.name.clone(),
        ];
        if let Some(filter) = &request.filter {
            args.push("--filter".to_string());
            args.push(filter.clone());
        }
        if request.dry_run {
            args.push("--dry-run".to_string());
        }
        if mode == LaunchMode::Retry {
            args.push("--retry".to_string());
        }
        args
    }

    /// Variables layered over the inherited environment.
    pub fn env_overlay(&self, config: &LaunchConfig) -> Vec<(&'static str, String)> {
        let mut env = vec![
            ("HOME_DIR", config.home_dir.display().to_string()),
            ("FINAL_REGISTRY", config.final_registry.clone()),
            ("REGISTRY_AUTH_FILE", config.registry_auth_file.display().to_string()),
        ];
        if let Some(key) = &config.entitlement_key {
            env.push(("ENTITLEMENT_KEY", key.clone()));
        }
        env
    }

    /// Spawn the script. Its stdout and stderr are forwarded to debug logs.
    pub fn spawn(
        &self,
        request: &LaunchRequest,
        config: &LaunchConfig,
        mode: LaunchMode,
    ) -> Result<ProcessHandle, ManagerError> {
        let mut cmd = Command::new(&self.interpreter);
        cmd.args(self.command_args(request, mode))
            .envs(self.env_overlay(config))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| ManagerError::Launch {
            program: self.interpreter.clone(),
            source,
        })?;
        let pid = child.id().unwrap_or_default();

        if let Some(stdout) = child.stdout.take() {
            forward_output(stdout, request.name.clone(), "stdout");
        }
        if let Some(stderr) = child.stderr.take() {
            forward_output(stderr, request.name.clone(), "stderr");
        }

        tracing::info!(
            name = %request.name,
            component = %request.component,
            version = %request.version,
            pid,
            retry = mode == LaunchMode::Retry,
            "mirror script spawned"
        );
        Ok(ProcessHandle { pid, child })
    }
}

/// Drain a child pipe line by line so the script never blocks on a full pipe.
fn forward_output<R>(stream: R, name: String, label: &'static str)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => tracing::debug!(name = %name, stream = label, "{line}"),
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(name = %name, stream = label, error = %e, "output stream closed");
                    break;
                }
            }
        }
    });
}

/// A spawned script process.
#[derive(Debug)]
pub struct ProcessHandle {
    pid: u32,
    child: Child,
}

impl ProcessHandle {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Exit code if the process has finished. A signal death reads as
    /// `128 + signal`.
    pub fn try_wait(&mut self) -> Option<i32> {
        match self.child.try_wait() {
            Ok(Some(status)) => Some(exit_code(status)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(pid = self.pid, error = %e, "failed to poll process status");
                None
            }
        }
    }

    /// Wait up to `timeout` for the process to exit.
    pub async fn wait_timeout(&mut self, timeout: Duration) -> Option<i32> {
        match tokio::time::timeout(timeout, self.child.wait()).await {
            Ok(Ok(status)) => Some(exit_code(status)),
            Ok(Err(e)) => {
                tracing::warn!(pid = self.pid, error = %e, "failed to wait on process");
                None
            }
            Err(_) => None,
        }
    }
}

fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.code().or_else(|| status.signal().map(|sig| 128 + sig)).unwrap_or(-1)
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
