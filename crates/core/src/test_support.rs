// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{JobId, JobRecord};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::job::JobStatus;
    use proptest::prelude::*;

    pub fn arb_job_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![
            Just(JobStatus::Running),
            Just(JobStatus::Progressing),
            Just(JobStatus::Completed),
            Just(JobStatus::Failed),
            Just(JobStatus::Stopped),
            Just(JobStatus::Dismissed),
        ]
    }

    pub fn arb_terminal_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![
            Just(JobStatus::Completed),
            Just(JobStatus::Failed),
            Just(JobStatus::Stopped),
            Just(JobStatus::Dismissed),
        ]
    }

    /// A monitor-visible event applied to a record.
    #[derive(Debug, Clone)]
    pub enum RecordEvent {
        LogGrew,
        MirrorPid(u32),
        Finish(JobStatus),
    }

    pub fn arb_record_event() -> impl Strategy<Value = RecordEvent> {
        prop_oneof![
            4 => Just(RecordEvent::LogGrew),
            1 => (2u32..100_000).prop_map(RecordEvent::MirrorPid),
            1 => arb_job_status().prop_map(RecordEvent::Finish),
        ]
    }
}

// ── Record factories ─────────────────────────────────────────────────────

/// Active record for `name` rooted at `home`.
pub fn running_record(id: &str, name: &str, home: &std::path::Path) -> JobRecord {
    JobRecord::builder()
        .id(JobId::from(id))
        .name(name)
        .home_dir(home)
        .log_file(crate::launch::log_path(home, name))
        .build()
}
