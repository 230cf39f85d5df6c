// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mj_core::test_support::running_record;
use mj_core::JobStatus;

#[test]
fn write_report_to_home_dir() {
    let home = tempfile::tempdir().unwrap();
    let mut record = running_record("nav-1", "nav", home.path());
    record.finish(JobStatus::Completed, Utc::now());

    let path = write_report(&record, Utc::now()).unwrap();
    assert_eq!(path, home.path().join("nav-summary-report.txt"));
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Directory Name:         nav"));
    assert!(text.contains("Directory Exists:       No"));
}

#[test]
fn write_report_creates_missing_home() {
    let root = tempfile::tempdir().unwrap();
    let home = root.path().join("not/yet");
    let record = running_record("nav-1", "nav", &home);
    assert!(write_report(&record, Utc::now()).is_ok());
    assert!(home.join("nav-summary-report.txt").exists());
}

#[test]
fn unwritable_report_is_logged_not_raised() {
    let root = tempfile::tempdir().unwrap();
    let blocker = root.path().join("file");
    std::fs::write(&blocker, "").unwrap();
    let record = running_record("nav-1", "nav", &blocker.join("home"));

    assert!(matches!(write_report(&record, Utc::now()), Err(ReportError::Write { .. })));
    assert_eq!(publish(&record, Utc::now()), None);
}
