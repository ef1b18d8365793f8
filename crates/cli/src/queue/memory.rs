// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory queue store.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use outbox_core::{generate_unique_record_id, Mutation, QueueRecord};

use super::{QueueError, QueueResult, QueueStore, StoreFuture};

/// Process-local queue store.
///
/// Contents are lost when the store is dropped. Failure injection hooks let
/// callers exercise the storage-failure paths of the sync engine.
#[derive(Default)]
pub struct MemoryQueueStore {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    records: Vec<QueueRecord>,
    unavailable: bool,
    failing: HashSet<String>,
}

impl MemoryQueueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with [`QueueError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Make removals and attempt updates of `id` fail with
    /// [`QueueError::RecordFailed`].
    pub fn fail_record(&self, id: &str) {
        self.lock().failing.insert(id.to_string());
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Returns true if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn checked(&self) -> QueueResult<MutexGuard<'_, MemoryState>> {
        let state = self.lock();
        if state.unavailable {
            return Err(QueueError::Unavailable("memory store disabled".to_string()));
        }
        Ok(state)
    }
}

impl MemoryState {
    fn check_record(&self, id: &str) -> QueueResult<()> {
        if self.failing.contains(id) {
            return Err(QueueError::RecordFailed {
                id: id.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl QueueStore for MemoryQueueStore {
    fn enqueue(&self, payload: Mutation) -> StoreFuture<'_, QueueRecord> {
        Box::pin(async move {
            let mut state = self.checked()?;
            let created_at = Utc::now();
            let id = generate_unique_record_id(&payload, &created_at, |candidate| {
                state.records.iter().any(|r| r.id == candidate)
            });
            let record = QueueRecord::new(id, payload, created_at);
            state.records.push(record.clone());
            Ok(record)
        })
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<QueueRecord>> {
        Box::pin(async move { Ok(self.checked()?.records.clone()) })
    }

    fn remove<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.checked()?;
            state.check_record(id)?;
            state.records.retain(|r| r.id != id);
            Ok(())
        })
    }

    fn update_attempts<'a>(&'a self, id: &'a str, attempts: u32) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.checked()?;
            state.check_record(id)?;
            if let Some(record) = state.records.iter_mut().find(|r| r.id == id) {
                record.attempts = attempts;
            }
            Ok(())
        })
    }
}
