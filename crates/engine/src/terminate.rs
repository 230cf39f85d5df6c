// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Force-killing a job's process tree.
//!
//! Every attempt is independent. A pid that no longer exists is a no-op,
//! and a failed attempt never stops the ones after it.

use mj_core::JobRecord;
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use serde::Serialize;
use std::path::Path;

/// Which part of the tree an attempt targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KillTarget {
    /// Worker pid announced in the log.
    Mirror,
    /// Direct child of the script process.
    Child,
    /// The script process itself.
    Main,
    /// Process matched by command line.
    Stray,
}

mj_core::simple_display! {
    KillTarget {
        Mirror => "mirror",
        Child => "child",
        Main => "main",
        Stray => "stray",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result", content = "error")]
pub enum KillResult {
    Killed,
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KillAttempt {
    pub target: KillTarget,
    pub pid: u32,
    pub result: KillResult,
}

/// Send `signal` to `pid`.
///
/// Returns `Ok(false)` when the process is gone or the pid is one we must
/// never signal (init, process groups, ourselves).
pub fn send_signal(pid: u32, signal: Signal) -> Result<bool, Errno> {
    let Ok(raw) = i32::try_from(pid) else {
        return Ok(false);
    };
    if raw <= 1 || pid == std::process::id() {
        tracing::debug!(pid, "refusing to signal protected pid");
        return Ok(false);
    }
    match kill(Pid::from_raw(raw), signal) {
        Ok(()) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        Err(e) => Err(e),
    }
}

fn attempt(target: KillTarget, pid: u32) -> KillAttempt {
    let result = match send_signal(pid, Signal::SIGKILL) {
        Ok(true) => KillResult::Killed,
        Ok(false) => KillResult::NotFound,
        Err(e) => {
            tracing::warn!(pid, target = %target, error = %e, "kill failed");
            KillResult::Failed(e.to_string())
        }
    };
    KillAttempt { target, pid, result }
}

/// Kill the mirror worker, the script's children, the script, then sweep
/// for stray workers whose command line names the job.
///
/// Children are enumerated before anything is killed so that reparenting
/// does not hide them.
pub fn kill_job_tree(record: &JobRecord, worker_signature: &str) -> Vec<KillAttempt> {
    let proc_root = Path::new("/proc");
    let children = child_pids(proc_root, record.main_pid);

    let mut attempts = Vec::new();
    if let Some(mirror) = record.mirror_pid {
        attempts.push(attempt(KillTarget::Mirror, mirror));
    }
    for pid in children {
        if Some(pid) != record.mirror_pid {
            attempts.push(attempt(KillTarget::Child, pid));
        }
    }
    attempts.push(attempt(KillTarget::Main, record.main_pid));
    for pid in stray_pids(proc_root, worker_signature, &record.name) {
        if !attempts.iter().any(|a| a.pid == pid) {
            attempts.push(attempt(KillTarget::Stray, pid));
        }
    }

    tracing::info!(
        job_id = %record.id,
        attempts = attempts.len(),
        killed = attempts.iter().filter(|a| a.result == KillResult::Killed).count(),
        "job process tree killed"
    );
    attempts
}

/// Direct children of `pid`.
///
/// Uses `/proc/<pid>/task/<pid>/children` when the kernel exposes it and
/// falls back to scanning every `/proc/<n>/stat` for a matching ppid.
pub fn child_pids(proc_root: &Path, pid: u32) -> Vec<u32> {
    let children_path = proc_root.join(format!("{pid}/task/{pid}/children"));
    if let Ok(contents) = std::fs::read_to_string(children_path) {
        return contents.split_whitespace().filter_map(|t| t.parse().ok()).collect();
    }
    proc_pids(proc_root)
        .into_iter()
        .filter(|&candidate| {
            std::fs::read_to_string(proc_root.join(format!("{candidate}/stat")))
                .ok()
                .and_then(|stat| parent_pid(&stat))
                == Some(pid)
        })
        .collect()
}

/// Parent pid from the contents of `/proc/<n>/stat`.
///
/// The command name is wrapped in parentheses and may itself contain
/// spaces or parentheses, so fields are read after the last `)`.
pub fn parent_pid(stat: &str) -> Option<u32> {
    let rest = &stat[stat.rfind(')')? + 1..];
    let mut fields = rest.split_whitespace();
    fields.next()?; // state
    fields.next()?.parse().ok()
}

/// Pids whose command line contains `signature` followed by `name` as a
/// whole argument or path segment.
pub fn stray_pids(proc_root: &Path, signature: &str, name: &str) -> Vec<u32> {
    if signature.is_empty() || name.is_empty() {
        return Vec::new();
    }
    proc_pids(proc_root)
        .into_iter()
        .filter(|&pid| {
            let Ok(raw) = std::fs::read(proc_root.join(format!("{pid}/cmdline"))) else {
                return false;
            };
            let cmdline = String::from_utf8_lossy(&raw).replace('\0', " ");
            cmdline
                .find(signature)
                .is_some_and(|at| names_job(&cmdline[at + signature.len()..], name))
        })
        .collect()
}

/// `mq` names `file://mq/images` and `--dest=mq` but not `mq-prod`.
fn names_job(args: &str, name: &str) -> bool {
    args.split(|c: char| c.is_whitespace() || matches!(c, '/' | '=' | ':'))
        .any(|segment| segment == name)
}

fn proc_pids(proc_root: &Path) -> Vec<u32> {
    let Ok(entries) = std::fs::read_dir(proc_root) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str().and_then(|s| s.parse().ok()))
        .collect()
}

#[cfg(test)]
#[path = "terminate_tests.rs"]
mod tests;
