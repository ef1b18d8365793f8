// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync engine: single-flight drains of the queue.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use outbox_core::{ConnectivityState, FailureKind, Mutation, QueueRecord};
use tracing::{debug, error, info, warn};

use super::replay::{ReplayError, Replayer};
use crate::monitor::{ConnectivityMonitor, Subscription};
use crate::queue::{QueueError, QueueResult, QueueStore};

/// Error type for sync engine operations.
///
/// Cloneable so that every caller coalesced onto one drain gets the result.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SyncError {
    /// The queue store failed.
    #[error("queue store failed: {0}")]
    Storage(Arc<QueueError>),

    /// The backend declined a submitted mutation. It was not queued.
    #[error("mutation rejected: {0}")]
    Rejected(ReplayError),

    /// The drain task died.
    #[error("drain task failed: {0}")]
    Task(String),
}

impl From<QueueError> for SyncError {
    fn from(err: QueueError) -> Self {
        SyncError::Storage(Arc::new(err))
    }
}

/// Result type for sync engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// How a drain pass ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrainStatus {
    /// Every record was attempted.
    #[default]
    Complete,
    /// The backend became unreachable; later records were not attempted.
    Interrupted,
}

/// Summary of one drain pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Records applied by the backend.
    pub replayed: usize,
    /// Records the backend declined; they stay queued.
    pub rejected: usize,
    /// Records dropped by the discard policy.
    pub discarded: usize,
    /// Records still queued after the pass, of those it listed.
    pub remaining: usize,
    pub status: DrainStatus,
}

/// Operator policy for dropping records that will never apply.
///
/// Both limits are off by default, so nothing is dropped unless configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscardPolicy {
    /// Drop a record once it has been rejected this many times.
    pub max_attempts: Option<u32>,
    /// Drop a record once it is older than this.
    pub max_age: Option<Duration>,
}

impl DiscardPolicy {
    /// Why `record` should be dropped, if it should.
    pub fn discard_reason(&self, record: &QueueRecord, now: DateTime<Utc>) -> Option<String> {
        if let Some(max) = self.max_attempts {
            if record.attempts >= max {
                return Some(format!("rejected {} times (limit {})", record.attempts, max));
            }
        }
        if let Some(max_age) = self.max_age {
            let age = record.age(now).to_std().unwrap_or_default();
            if age > max_age {
                return Some(format!(
                    "queued {}s ago (limit {}s)",
                    age.as_secs(),
                    max_age.as_secs()
                ));
            }
        }
        None
    }
}

/// Result of [`SyncEngine::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The backend applied the mutation.
    Applied,
    /// The backend was unreachable; the mutation was queued for replay.
    Queued(QueueRecord),
}

type DrainFuture = Shared<BoxFuture<'static, SyncResult<DrainReport>>>;

/// Replays the queue against the backend.
///
/// Cheap to clone; clones share the store, the replayer and the single-flight
/// guard.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    store: Arc<dyn QueueStore>,
    replayer: Arc<dyn Replayer>,
    policy: DiscardPolicy,
    /// The drain pass currently running, if any.
    in_flight: Mutex<Option<DrainFuture>>,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn QueueStore>, replayer: Arc<dyn Replayer>, policy: DiscardPolicy) -> Self {
        SyncEngine {
            inner: Arc::new(EngineInner {
                store,
                replayer,
                policy,
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Replay every queued record in insertion order.
    ///
    /// At most one pass runs at a time. Calling `drain` while a pass is in
    /// flight joins that pass and returns its report, so no record is
    /// replayed twice. The pass runs on its own task and completes even if
    /// every caller stops waiting.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Storage`] if the queue cannot be listed or the
    /// store becomes unavailable mid-pass. Failures scoped to one record are
    /// logged and skipped.
    pub async fn drain(&self) -> SyncResult<DrainReport> {
        let pass = {
            let mut slot = lock(&self.inner.in_flight);
            match slot.as_ref() {
                Some(pass) => {
                    debug!("drain already in flight, joining it");
                    pass.clone()
                }
                None => {
                    let pass = self.start_pass();
                    *slot = Some(pass.clone());
                    pass
                }
            }
        };
        pass.await
    }

    /// Spawn a pass. Called with the in-flight slot locked.
    fn start_pass(&self) -> DrainFuture {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let result = inner.drain_pass().await;
            *lock(&inner.in_flight) = None;
            result
        });
        async move {
            handle
                .await
                .unwrap_or_else(|e| Err(SyncError::Task(e.to_string())))
        }
        .boxed()
        .shared()
    }

    /// Try `mutation` now, queueing it if the backend is unreachable.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Rejected`] if the backend declined the mutation,
    /// or [`SyncError::Storage`] if it had to be queued and the store failed.
    pub async fn submit(&self, mutation: Mutation) -> SyncResult<Submission> {
        match self.inner.replayer.replay(&mutation).await {
            Ok(()) => Ok(Submission::Applied),
            Err(e) if e.kind().should_enqueue() => {
                debug!("submit failed, queueing: {}", e);
                let record = self.inner.store.enqueue(mutation).await?;
                info!(id = %record.id, "mutation queued for replay");
                Ok(Submission::Queued(record))
            }
            Err(e) => {
                warn!(method = %mutation.method, path = %mutation.path, "mutation rejected: {}", e);
                Err(SyncError::Rejected(e))
            }
        }
    }

    /// Drain automatically every time `monitor` goes online.
    ///
    /// Drains are spawned on the current tokio runtime. Unsubscribe the
    /// returned handle to stop.
    pub fn drain_on_reconnect(&self, monitor: &ConnectivityMonitor) -> Subscription {
        let engine = self.clone();
        monitor.subscribe(move |state| {
            if state != ConnectivityState::Online {
                return;
            }
            let Ok(runtime) = tokio::runtime::Handle::try_current() else {
                warn!("no tokio runtime, skipping automatic drain");
                return;
            };
            let engine = engine.clone();
            runtime.spawn(async move {
                match engine.drain().await {
                    Ok(report) => debug!(?report, "automatic drain finished"),
                    Err(e) => error!("automatic drain failed: {}", e),
                }
            });
        })
    }

    /// Number of queued records.
    pub async fn pending_count(&self) -> SyncResult<usize> {
        Ok(self.inner.store.list_all().await?.len())
    }
}

impl EngineInner {
    async fn drain_pass(&self) -> SyncResult<DrainReport> {
        let records = self.store.list_all().await.map_err(|e| {
            error!("cannot list queue: {}", e);
            SyncError::from(e)
        })?;

        let total = records.len();
        let now = Utc::now();
        let mut report = DrainReport::default();
        debug!(records = total, "drain started");

        for (index, record) in records.into_iter().enumerate() {
            if let Some(reason) = self.policy.discard_reason(&record, now) {
                warn!(id = %record.id, "discarding queued mutation: {}", reason);
                match self.store.remove(&record.id).await {
                    Ok(()) => report.discarded += 1,
                    Err(e) => {
                        self.store_failure(&record.id, e)?;
                        report.remaining += 1;
                    }
                }
                continue;
            }

            match self.replayer.replay(&record.payload).await {
                Ok(()) => {
                    report.replayed += 1;
                    if let Err(e) = self.store.remove(&record.id).await {
                        self.store_failure(&record.id, e)?;
                        report.remaining += 1;
                    }
                }
                Err(e) if e.kind() == FailureKind::ConnectivityLost => {
                    info!(id = %record.id, "backend unreachable, stopping drain: {}", e);
                    report.status = DrainStatus::Interrupted;
                    report.remaining += total - index;
                    break;
                }
                Err(e) => {
                    let attempts = record.attempts.saturating_add(1);
                    warn!(id = %record.id, attempts, "replay rejected: {}", e);
                    report.rejected += 1;
                    report.remaining += 1;
                    if let Err(e) = self.store.update_attempts(&record.id, attempts).await {
                        self.store_failure(&record.id, e)?;
                    }
                }
            }
        }

        info!(
            replayed = report.replayed,
            rejected = report.rejected,
            discarded = report.discarded,
            remaining = report.remaining,
            status = ?report.status,
            "drain finished"
        );
        Ok(report)
    }

    /// Abort the pass if the store is gone, otherwise skip the record.
    fn store_failure(&self, id: &str, err: QueueError) -> QueueResult<()> {
        error!(id, "queue store failed: {}", err);
        if err.is_unavailable() {
            Err(err)
        } else {
            Ok(())
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
