// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mj-core: Core types for the mirror job (mj) supervisor

pub mod macros;

pub mod clock;
pub mod id;
pub mod job;
pub mod launch;
pub mod markers;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use id::JobId;
#[cfg(any(test, feature = "test-support"))]
pub use job::JobRecordBuilder;
pub use job::{HistoryEntry, JobRecord, JobStatus, PROGRESS_CEILING, PROGRESS_STEP};
pub use launch::{LaunchConfig, LaunchOverrides, LaunchRequest};
pub use markers::LogVerdict;
