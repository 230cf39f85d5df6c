// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::strategies::*;
use crate::{Clock, FakeClock};
use proptest::prelude::*;
use yare::parameterized;

#[parameterized(
    running = { JobStatus::Running, false },
    progressing = { JobStatus::Progressing, false },
    completed = { JobStatus::Completed, true },
    failed = { JobStatus::Failed, true },
    stopped = { JobStatus::Stopped, true },
    dismissed = { JobStatus::Dismissed, true },
)]
fn terminal_statuses(status: JobStatus, terminal: bool) {
    assert_eq!(status.is_terminal(), terminal);
}

#[test]
fn status_display_and_serde_agree() {
    let json = serde_json::to_string(&JobStatus::Progressing).unwrap();
    assert_eq!(json, "\"progressing\"");
    assert_eq!(JobStatus::Progressing.to_string(), "progressing");
}

#[test]
fn new_record_from_request() {
    let clock = FakeClock::new();
    let request = LaunchRequest::new("ibm-mq", "9.3.5", "mq").filter("amd64");
    let config = LaunchConfig::default().home_dir("/data").entitlement_key("key");
    let record = JobRecord::new(JobId::from("mq-1"), &request, &config, 77, clock.now());

    assert_eq!(record.status, JobStatus::Running);
    assert_eq!(record.progress, 0);
    assert_eq!(record.main_pid, 77);
    assert_eq!(record.log_file, PathBuf::from("/data/mq/mq-download.log"));
    assert_eq!(record.filter.as_deref(), Some("amd64"));
    assert_eq!(record.entitlement_key.as_deref(), Some("key"));
    assert!(record.end_time.is_none());
}

#[test]
fn log_growth_steps_and_caps() {
    let mut record = JobRecord::builder().build();
    assert!(record.record_log_growth());
    assert_eq!(record.progress, 5);
    assert_eq!(record.status, JobStatus::Progressing);

    for _ in 0..40 {
        record.record_log_growth();
    }
    assert_eq!(record.progress, PROGRESS_CEILING);
}

#[test]
fn log_growth_ignored_after_terminal() {
    let mut record = JobRecord::builder().progress(40).build();
    record.finish(JobStatus::Failed, DateTime::<Utc>::UNIX_EPOCH);
    assert!(!record.record_log_growth());
    assert_eq!(record.progress, 40);
    assert_eq!(record.status, JobStatus::Failed);
}

#[test]
fn mirror_pid_assigned_once() {
    let mut record = JobRecord::builder().main_pid(10).build();
    assert_eq!(record.display_pid(), 10);
    assert!(record.assign_mirror_pid(4821));
    assert!(!record.assign_mirror_pid(9999));
    assert_eq!(record.mirror_pid, Some(4821));
    assert_eq!(record.display_pid(), 4821);
}

#[test]
fn completion_forces_full_progress() {
    let clock = FakeClock::new();
    let mut record = JobRecord::builder().progress(35).build();
    assert!(record.finish(JobStatus::Completed, clock.now()));
    assert_eq!(record.progress, 100);
    assert_eq!(record.end_time, Some(clock.now()));
}

#[test]
fn finish_is_guarded() {
    let mut record = JobRecord::builder().build();
    assert!(!record.finish(JobStatus::Progressing, DateTime::<Utc>::UNIX_EPOCH));
    assert!(record.finish(JobStatus::Dismissed, DateTime::<Utc>::UNIX_EPOCH));
    assert!(!record.finish(JobStatus::Completed, DateTime::<Utc>::UNIX_EPOCH));
    assert_eq!(record.status, JobStatus::Dismissed);
    assert_ne!(record.progress, 100);
}

#[test]
fn return_code_recorded_once() {
    let mut record = JobRecord::builder().build();
    record.record_return_code(1);
    record.record_return_code(0);
    assert_eq!(record.return_code, Some(1));
}

#[test]
fn elapsed_uses_end_time_when_finished() {
    let clock = FakeClock::new();
    let mut record = JobRecord::builder().start_time(clock.now()).build();
    clock.advance(std::time::Duration::from_secs(90));
    assert_eq!(record.elapsed(clock.now()).num_seconds(), 90);
    record.finish(JobStatus::Completed, clock.now());
    clock.advance(std::time::Duration::from_secs(30));
    assert_eq!(record.elapsed(clock.now()).num_seconds(), 90);
}

#[test]
fn history_entry_is_transparent() {
    let record = JobRecord::builder().build();
    let entry = HistoryEntry::from(record.clone());
    assert_eq!(entry.name, record.name);
    assert_eq!(serde_json::to_value(&entry).unwrap(), serde_json::to_value(&record).unwrap());
    assert_eq!(entry.into_record(), record);
}

proptest! {
    #[test]
    fn lifecycle_invariants_hold(events in prop::collection::vec(arb_record_event(), 0..60)) {
        let mut record = JobRecord::builder().build();
        let mut first_mirror = None;
        let mut terminal_status = None;

        for event in events {
            let before = record.progress;
            match event {
                RecordEvent::LogGrew => { record.record_log_growth(); }
                RecordEvent::MirrorPid(pid) => {
                    record.assign_mirror_pid(pid);
                    first_mirror.get_or_insert(pid);
                }
                RecordEvent::Finish(status) => {
                    record.finish(status, DateTime::<Utc>::UNIX_EPOCH);
                }
            }
            prop_assert!(record.progress >= before);
            prop_assert!(record.progress <= 100);
            prop_assert_eq!(record.mirror_pid, first_mirror);
            if let Some(status) = terminal_status {
                prop_assert_eq!(record.status, status);
            } else if record.is_terminal() {
                terminal_status = Some(record.status);
            }
            if !record.is_terminal() {
                prop_assert!(record.progress <= PROGRESS_CEILING);
            }
        }
    }

    #[test]
    fn terminal_status_is_sticky(first in arb_terminal_status(), second in arb_terminal_status()) {
        let mut record = JobRecord::builder().build();
        record.finish(first, DateTime::<Utc>::UNIX_EPOCH);
        record.finish(second, DateTime::<Utc>::UNIX_EPOCH);
        prop_assert_eq!(record.status, first);
    }
}
