// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mj_core::test_support::running_record;
use yare::parameterized;

#[parameterized(
    tar = { "layer.tar", (1, 0, 0) },
    tar_gz = { "images.tar.gz", (1, 0, 0) },
    tgz = { "bundle.tgz", (1, 0, 0) },
    mapping = { "mapping.txt", (0, 1, 0) },
    mapping_upper = { "Image-Mapping.json", (0, 1, 0) },
    mapping_archive_counts_as_archive = { "mapping.tar", (1, 0, 0) },
    mapping_log_counts_as_mapping = { "mapping.log", (0, 1, 0) },
    log = { "mq-download.log", (0, 0, 1) },
    other = { ".image-config.json", (0, 0, 0) },
)]
fn classify_cases(name: &str, expected: (usize, usize, usize)) {
    let mut stats = DirStats::default();
    classify(&mut stats, name);
    assert_eq!((stats.image_archives, stats.mapping_files, stats.log_files), expected);
}

#[test]
fn dir_stats_walks_recursively() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("v2/blobs")).unwrap();
    std::fs::write(root.join("mapping.txt"), "a=b\n").unwrap();
    std::fs::write(root.join("v2/blobs/one.tar"), vec![0u8; 100]).unwrap();
    std::fs::write(root.join("v2/run.log"), "x").unwrap();

    let stats = dir_stats(root).unwrap();
    assert_eq!(stats.files, 3);
    assert_eq!(stats.dirs, 2);
    assert_eq!(stats.size_bytes, 4 + 100 + 1);
    assert_eq!((stats.image_archives, stats.mapping_files, stats.log_files), (1, 1, 1));
}

#[test]
fn dir_stats_absent_dir() {
    let dir = tempfile::tempdir().unwrap();
    assert!(dir_stats(&dir.path().join("missing")).is_none());
}

#[test]
fn listed_images_skip_blank_and_comment_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mapping.txt");
    std::fs::write(&path, "# header\nsrc/a=dst/a\n\n   \nsrc/b=dst/b\n  # indented comment counts\n").unwrap();
    assert_eq!(count_listed_images(&path), 3);
    assert_eq!(count_listed_images(&dir.path().join("none.txt")), 0);
}

#[parameterized(
    empty = { DiskUsage { total: 0, used: 0, available: 0 }, 0 },
    half = { DiskUsage { total: 100, used: 50, available: 50 }, 50 },
    rounds_up = { DiskUsage { total: 300, used: 1, available: 299 }, 1 },
    reserved_blocks = { DiskUsage { total: 100, used: 45, available: 45 }, 50 },
)]
fn use_percent_cases(disk: DiskUsage, expected: u64) {
    assert_eq!(disk.use_percent(), expected);
}

#[test]
fn disk_usage_of_temp_dir() {
    let dir = tempfile::tempdir().unwrap();
    let disk = disk_usage(dir.path()).unwrap();
    assert!(disk.total > 0);
    assert!(disk.used <= disk.total);
    assert!(disk_usage(&dir.path().join("missing")).is_none());
}

#[test]
fn collect_for_failed_job_quotes_errors() {
    let home = tempfile::tempdir().unwrap();
    let mut record = running_record("mq-1", "mq", home.path());
    std::fs::create_dir_all(home.path().join("mq")).unwrap();
    std::fs::write(&record.log_file, "start\nwarning: slow\nERROR: one or more errors occurred\n").unwrap();
    std::fs::write(home.path().join("mq/mapping.txt"), "a=b\nc=d\n").unwrap();
    record.finish(mj_core::JobStatus::Failed, chrono::Utc::now());

    let stats = ReportStats::collect(&record);
    assert!(stats.log.exists());
    assert!(stats.mapping.exists());
    assert_eq!(stats.images_listed, 2);
    assert!(!stats.image_config.exists());
    assert_eq!(stats.error_lines, vec!["ERROR: one or more errors occurred"]);
    assert_eq!(stats.dir.unwrap().files, 2);
}

#[test]
fn collect_for_completed_job_has_no_errors() {
    let home = tempfile::tempdir().unwrap();
    let mut record = running_record("mq-1", "mq", home.path());
    std::fs::create_dir_all(home.path().join("mq")).unwrap();
    std::fs::write(&record.log_file, "error: transient\nINFO: Mirroring completed.\n").unwrap();
    record.finish(mj_core::JobStatus::Completed, chrono::Utc::now());

    assert!(ReportStats::collect(&record).error_lines.is_empty());
}
