// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared store of active jobs and retired history.
//!
//! One mutex guards both collections. It is held only for the map access
//! itself; callers read logs, signal processes and write reports after the
//! guard is dropped.

use crate::error::ManagerError;
use chrono::{DateTime, Utc};
use mj_core::{HistoryEntry, JobId, JobRecord, JobStatus};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Result of a terminal transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retirement {
    /// This call made the job terminal and appended it to history.
    Retired(JobRecord),
    /// Someone else already retired the job.
    AlreadyTerminal(JobRecord),
    Missing,
}

#[derive(Default)]
struct RegistryState {
    active: HashMap<JobId, JobRecord>,
    history: Vec<HistoryEntry>,
}

#[derive(Default)]
pub struct JobRegistry {
    inner: Mutex<RegistryState>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: JobRecord) -> Result<(), ManagerError> {
        let mut state = self.inner.lock();
        if state.active.contains_key(&record.id) {
            return Err(ManagerError::DuplicateJob(record.id));
        }
        state.active.insert(record.id.clone(), record);
        Ok(())
    }

    /// Insert a record under `base`, or `<base>-<n>` with the smallest free
    /// `n >= 2` when `base` is taken. Returns the inserted record.
    pub fn insert_fresh<F>(&self, base: JobId, build: F) -> JobRecord
    where
        F: FnOnce(JobId) -> JobRecord,
    {
        let mut state = self.inner.lock();
        let mut id = base.clone();
        let mut n = 2;
        while state.active.contains_key(&id) {
            id = base.with_suffix(n);
            n += 1;
        }
        let mut record = build(id.clone());
        record.id = id.clone();
        state.active.insert(id, record.clone());
        record
    }

    pub fn get(&self, id: &str) -> Option<JobRecord> {
        self.inner.lock().active.get(id).cloned()
    }

    pub fn status(&self, id: &str) -> Option<JobStatus> {
        self.inner.lock().active.get(id).map(|record| record.status)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.lock().active.contains_key(id)
    }

    /// Active jobs, oldest first.
    pub fn active(&self) -> Vec<JobRecord> {
        let mut records: Vec<JobRecord> = self.inner.lock().active.values().cloned().collect();
        records.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        records
    }

    /// Retired jobs in retirement order.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.inner.lock().history.clone()
    }

    /// Mutate an active record in place.
    pub fn update<R>(&self, id: &str, f: impl FnOnce(&mut JobRecord) -> R) -> Option<R> {
        self.inner.lock().active.get_mut(id).map(f)
    }

    /// Make a job terminal and append it to history, at most once.
    pub fn retire(&self, id: &str, status: JobStatus, at: DateTime<Utc>) -> Retirement {
        let mut state = self.inner.lock();
        Self::retire_locked(&mut state, id, status, at)
    }

    fn retire_locked(
        state: &mut RegistryState,
        id: &str,
        status: JobStatus,
        at: DateTime<Utc>,
    ) -> Retirement {
        let Some(record) = state.active.get_mut(id) else {
            return Retirement::Missing;
        };
        if !record.finish(status, at) {
            return Retirement::AlreadyTerminal(record.clone());
        }
        let snapshot = record.clone();
        state.history.push(HistoryEntry::from(snapshot.clone()));
        Retirement::Retired(snapshot)
    }

    pub fn remove(&self, id: &str) -> Option<JobRecord> {
        self.inner.lock().active.remove(id)
    }

    /// Remove `id` only while it still belongs to the process `main_pid`.
    ///
    /// Ids are reusable once removed, so a monitor must not remove a newer
    /// job that took over its id.
    pub fn remove_owned(&self, id: &str, main_pid: u32) -> Option<JobRecord> {
        let mut state = self.inner.lock();
        if state.active.get(id).is_some_and(|record| record.main_pid == main_pid) {
            state.active.remove(id)
        } else {
            None
        }
    }

    /// Look a job up in the active map, then in history (latest first).
    pub fn find(&self, id: &str) -> Option<JobRecord> {
        let state = self.inner.lock();
        state.active.get(id).cloned().or_else(|| {
            state.history.iter().rev().find(|entry| entry.id == id).map(|entry| entry.record().clone())
        })
    }

    /// Latest history entry for `id`.
    pub fn history_entry(&self, id: &str) -> Option<HistoryEntry> {
        self.inner.lock().history.iter().rev().find(|entry| entry.id == id).cloned()
    }

    /// Drop every active record and history entry for the job `name`.
    /// Returns `(active_removed, history_removed)`.
    pub fn purge_name(&self, name: &str) -> (usize, usize) {
        let mut state = self.inner.lock();
        let active_before = state.active.len();
        state.active.retain(|_, record| record.name != name);
        let history_before = state.history.len();
        state.history.retain(|entry| entry.name != name);
        (active_before - state.active.len(), history_before - state.history.len())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
