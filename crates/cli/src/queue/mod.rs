// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent queue of mutations awaiting replay.
//!
//! Two stores implement [`QueueStore`]:
//! - [`JsonlQueueStore`] - durable, one record per line, survives restarts
//! - [`MemoryQueueStore`] - process-local, used for tests and ephemeral runs
//!
//! Every operation is individually atomic: a concurrent reader never sees a
//! half-written record. Store failures are reported as [`QueueError`] and are
//! never conflated with an empty queue.

mod jsonl;
mod memory;

pub use jsonl::JsonlQueueStore;
pub use memory::MemoryQueueStore;

use std::future::Future;
use std::pin::Pin;

use outbox_core::{Mutation, QueueRecord};

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored line could not be decoded.
    #[error("corrupted queue at line {line}: {reason}")]
    Corrupted { line: usize, reason: String },

    /// The backing store cannot be reached at all.
    #[error("queue store unavailable: {0}")]
    Unavailable(String),

    /// The store could not apply an operation to one record.
    #[error("operation on record {id} failed: {reason}")]
    RecordFailed { id: String, reason: String },
}

impl QueueError {
    /// Returns true if the store itself is unusable, as opposed to a failure
    /// scoped to a single record.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            QueueError::Io(_) | QueueError::Corrupted { .. } | QueueError::Unavailable(_)
        )
    }
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Boxed future returned by [`QueueStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = QueueResult<T>> + Send + 'a>>;

/// Durable FIFO storage for queued mutations.
pub trait QueueStore: Send + Sync {
    /// Store a new record with a fresh ID and zero attempts.
    fn enqueue(&self, payload: Mutation) -> StoreFuture<'_, QueueRecord>;

    /// All records in insertion order.
    ///
    /// Each call reads the current contents; there is no cursor.
    fn list_all(&self) -> StoreFuture<'_, Vec<QueueRecord>>;

    /// Delete a record. Removing an absent ID is a no-op.
    fn remove<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()>;

    /// Persist a new attempt counter. Updating an absent ID is a no-op.
    fn update_attempts<'a>(&'a self, id: &'a str, attempts: u32) -> StoreFuture<'a, ()>;
}
