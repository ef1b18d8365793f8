// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic HTTP health probing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use outbox_core::{probe_state, CallOutcome};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::MonitorShared;
use crate::http;

/// A single reachability check against the backend.
pub trait HealthProbe: Send + Sync {
    /// Perform one probe and describe what happened.
    fn check(&self) -> Pin<Box<dyn Future<Output = CallOutcome> + Send + '_>>;
}

/// Timing for health probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthCheckConfig {
    /// Time between probe starts.
    pub interval: Duration,
    /// A probe that has not finished after this long counts as no response.
    pub timeout: Duration,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        HealthCheckConfig {
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Probes a health endpoint with `GET`.
///
/// Success is judged solely by the response status, never by its body.
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpProbe {
    /// Probe `url`, giving up on each request after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(HttpProbe {
            client: http::build_client(timeout)?,
            url: url.into(),
        })
    }

    /// The probed URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl HealthProbe for HttpProbe {
    fn check(&self) -> Pin<Box<dyn Future<Output = CallOutcome> + Send + '_>> {
        Box::pin(async move {
            match self.client.get(&self.url).send().await {
                Ok(response) => http::outcome_from_response(&response),
                Err(e) => {
                    debug!(url = %self.url, "health probe failed: {}", e);
                    http::outcome_from_error(&e)
                }
            }
        })
    }
}

/// Owns a running health-check task.
///
/// [`HealthCheckGuard::teardown`] (or dropping the guard) cancels the
/// interval and any probe in flight.
pub struct HealthCheckGuard {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl HealthCheckGuard {
    /// Stop probing. Idempotent.
    pub fn teardown(&self) {
        self.cancel.cancel();
        self.handle.abort();
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for HealthCheckGuard {
    fn drop(&mut self) {
        self.teardown();
    }
}

pub(super) fn spawn<P>(
    shared: Arc<MonitorShared>,
    probe: P,
    config: HealthCheckConfig,
    cancel: CancellationToken,
) -> HealthCheckGuard
where
    P: HealthProbe + 'static,
{
    let task_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        run(&shared, &probe, config, &task_cancel).await;
        debug!("health checks stopped");
    });
    HealthCheckGuard { cancel, handle }
}

/// Probe loop.
///
/// Probes run one at a time. A tick that came due while a probe was still
/// outstanding is dropped, so a slow probe never has extra probes queued
/// behind it.
async fn run<P: HealthProbe>(
    shared: &MonitorShared,
    probe: &P,
    config: HealthCheckConfig,
    cancel: &CancellationToken,
) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_finished: Option<Instant> = None;

    loop {
        let scheduled = tokio::select! {
            _ = cancel.cancelled() => return,
            scheduled = ticker.tick() => scheduled,
        };

        if last_finished.is_some_and(|finished| scheduled < finished) {
            trace!("probe still outstanding at tick, skipping");
            continue;
        }

        let outcome = tokio::select! {
            _ = cancel.cancelled() => return,
            result = tokio::time::timeout(config.timeout, probe.check()) => {
                result.unwrap_or(CallOutcome::NoResponse)
            }
        };
        last_finished = Some(Instant::now());

        let next = probe_state(&outcome);
        debug!(?outcome, state = %next, "health probe finished");
        shared.transition(next);
    }
}
