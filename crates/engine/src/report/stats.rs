// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort statistics about a job's directory and host.
//!
//! Each figure is gathered independently; a failure leaves that figure
//! empty and is logged, never aborting the report.

use crate::log_tail;
use mj_core::{markers, JobRecord, JobStatus};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const MAPPING_FILE: &str = "mapping.txt";
pub const IMAGE_CONFIG_FILE: &str = ".image-config.json";

/// Lines inspected at the end of a failed log.
const ERROR_WINDOW: usize = 10;
/// Error lines quoted in a report.
const ERROR_LIMIT: usize = 5;

/// Counts from walking the job directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirStats {
    pub size_bytes: u64,
    pub files: usize,
    pub dirs: usize,
    /// `.tar`, `.tar.gz` and `.tgz` archives.
    pub image_archives: usize,
    /// Non-archive files whose name contains "mapping".
    pub mapping_files: usize,
    /// Remaining `.log` files.
    pub log_files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFile {
    pub path: PathBuf,
    pub size: Option<u64>,
}

impl KeyFile {
    fn probe(path: PathBuf) -> Self {
        let size = std::fs::metadata(&path).ok().map(|meta| meta.len());
        Self { path, size }
    }

    pub fn exists(&self) -> bool {
        self.size.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

impl DiskUsage {
    /// Percentage of non-reserved space in use, rounded up like `df`.
    pub fn use_percent(&self) -> u64 {
        let usable = self.used + self.available;
        if usable == 0 {
            return 0;
        }
        (self.used * 100).div_ceil(usable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportStats {
    pub job_dir: PathBuf,
    /// `None` when the directory is absent or could not be walked.
    pub dir: Option<DirStats>,
    pub log: KeyFile,
    pub mapping: KeyFile,
    pub images_listed: usize,
    pub image_config: KeyFile,
    pub hostname: Option<String>,
    pub disk: Option<DiskUsage>,
    pub error_lines: Vec<String>,
}

impl ReportStats {
    pub fn collect(record: &JobRecord) -> Self {
        let job_dir = mj_core::launch::job_dir(&record.home_dir, &record.name);
        let mapping = KeyFile::probe(job_dir.join(MAPPING_FILE));
        let images_listed = if mapping.exists() { count_listed_images(&mapping.path) } else { 0 };
        let error_lines = if record.status == JobStatus::Failed {
            let tail = log_tail::tail_lines(&record.log_file, ERROR_WINDOW).join("\n");
            markers::error_excerpt(&tail, ERROR_WINDOW, ERROR_LIMIT)
        } else {
            Vec::new()
        };

        Self {
            dir: dir_stats(&job_dir),
            log: KeyFile::probe(record.log_file.clone()),
            mapping,
            images_listed,
            image_config: KeyFile::probe(job_dir.join(IMAGE_CONFIG_FILE)),
            hostname: hostname(),
            disk: disk_usage(&record.home_dir),
            error_lines,
            job_dir,
        }
    }
}

/// Classify a file name. Archives take precedence over mapping files,
/// which take precedence over logs.
fn classify(stats: &mut DirStats, file_name: &str) {
    if file_name.ends_with(".tar") || file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz")
    {
        stats.image_archives += 1;
    } else if file_name.to_lowercase().contains("mapping") {
        stats.mapping_files += 1;
    } else if file_name.ends_with(".log") {
        stats.log_files += 1;
    }
}

pub fn dir_stats(dir: &Path) -> Option<DirStats> {
    if !dir.is_dir() {
        return None;
    }
    let mut stats = DirStats::default();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_dir() {
            stats.dirs += 1;
            continue;
        }
        stats.files += 1;
        if let Ok(meta) = entry.metadata() {
            stats.size_bytes += meta.len();
        }
        classify(&mut stats, &entry.file_name().to_string_lossy());
    }
    Some(stats)
}

/// Non-blank lines of the mapping file that are not `#` comments.
pub fn count_listed_images(path: &Path) -> usize {
    match std::fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
            .count(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "mapping file unreadable");
            0
        }
    }
}

fn hostname() -> Option<String> {
    match nix::unistd::gethostname() {
        Ok(name) => Some(name.to_string_lossy().into_owned()),
        Err(e) => {
            tracing::debug!(error = %e, "hostname unavailable");
            None
        }
    }
}

pub fn disk_usage(path: &Path) -> Option<DiskUsage> {
    match nix::sys::statvfs::statvfs(path) {
        Ok(vfs) => {
            let frag = vfs.fragment_size() as u64;
            let total = vfs.blocks() as u64 * frag;
            let free = vfs.blocks_free() as u64 * frag;
            let available = vfs.blocks_available() as u64 * frag;
            Some(DiskUsage { total, used: total.saturating_sub(free), available })
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "filesystem stats unavailable");
            None
        }
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
