// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket heartbeat monitoring.
//!
//! While the socket is open, a ping tagged with a fresh sequence number is
//! sent every `ping_interval`. The pong must arrive within `pong_timeout`:
//! - pong for the outstanding ping: `Online`, timeout cancelled
//! - timeout first: `Offline`
//!
//! Only the latest ping is ever outstanding. A pong for any other ping, or
//! one arriving after its timeout fired, is stale and ignored.

use std::sync::Arc;
use std::time::Duration;

use outbox_core::{ConnectivityState, SocketMessage};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::MonitorShared;
use crate::transport::{SocketEvent, SocketReceiver, SocketSender};

/// Timing for the ping/pong heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatConfig {
    /// Time between pings while the socket is open.
    pub ping_interval: Duration,
    /// Max time to wait for the pong.
    pub pong_timeout: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        HeartbeatConfig {
            ping_interval: Duration::from_secs(15),
            pong_timeout: Duration::from_secs(3),
        }
    }
}

/// Owns a running socket-monitoring task.
///
/// [`SocketGuard::teardown`] (or dropping the guard) cancels the ping
/// interval and any pending pong timeout, and releases both socket halves.
pub struct SocketGuard {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl SocketGuard {
    /// Stop monitoring the socket. Idempotent.
    pub fn teardown(&self) {
        self.cancel.cancel();
        self.handle.abort();
    }

    /// Returns true once the task has exited, either after teardown or
    /// because the socket is gone.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SocketGuard {
    fn drop(&mut self) {
        self.teardown();
    }
}

pub(super) fn spawn<Tx, Rx>(
    shared: Arc<MonitorShared>,
    sender: Tx,
    receiver: Rx,
    config: HeartbeatConfig,
    cancel: CancellationToken,
) -> SocketGuard
where
    Tx: SocketSender + 'static,
    Rx: SocketReceiver + 'static,
{
    let task_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        let mut heartbeat = Heartbeat {
            shared: &shared,
            config,
            open: false,
            last_ping_id: 0,
            outstanding: None,
        };
        heartbeat.run(sender, receiver, &task_cancel).await;
        debug!("socket monitoring stopped");
    });
    SocketGuard { cancel, handle }
}

/// A ping awaiting its pong.
#[derive(Debug, Clone, Copy)]
struct OutstandingPing {
    id: u64,
    deadline: Instant,
}

struct Heartbeat<'a> {
    shared: &'a MonitorShared,
    config: HeartbeatConfig,
    open: bool,
    last_ping_id: u64,
    outstanding: Option<OutstandingPing>,
}

impl Heartbeat<'_> {
    async fn run<Tx, Rx>(&mut self, mut sender: Tx, mut receiver: Rx, cancel: &CancellationToken)
    where
        Tx: SocketSender,
        Rx: SocketReceiver,
    {
        let period = self.config.ping_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let deadline = self.outstanding.map(|ping| ping.deadline);

            tokio::select! {
                _ = cancel.cancelled() => return,

                event = receiver.next_event() => match event {
                    Some(SocketEvent::Open) => {
                        self.open = true;
                        // First ping one full interval after open
                        ticker.reset();
                        self.shared.transition(ConnectivityState::Connecting);
                    }
                    Some(SocketEvent::Message(text)) => self.handle_frame(&text),
                    Some(SocketEvent::Close) => {
                        debug!("socket closed");
                        self.lose(ConnectivityState::Offline);
                    }
                    Some(SocketEvent::Error(e)) => {
                        warn!("socket error: {}", e);
                        self.lose(ConnectivityState::Error);
                    }
                    None => {
                        if self.open {
                            self.lose(ConnectivityState::Offline);
                        }
                        return;
                    }
                },

                _ = ticker.tick(), if self.open => {
                    if self.outstanding.is_some() {
                        trace!("previous ping still outstanding, skipping");
                        continue;
                    }
                    self.send_ping(&mut sender).await;
                }

                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(ping) = self.outstanding.take() {
                        debug!(ping_id = ping.id, "pong timed out");
                        self.shared.transition(ConnectivityState::Offline);
                    }
                }
            }
        }
    }

    async fn send_ping<Tx: SocketSender>(&mut self, sender: &mut Tx) {
        self.last_ping_id += 1;
        let id = self.last_ping_id;

        let json = match SocketMessage::ping(id).to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to encode ping: {}", e);
                self.shared.transition(ConnectivityState::Error);
                return;
            }
        };

        match sender.send_text(json).await {
            Ok(()) => {
                trace!(ping_id = id, "ping sent");
                self.outstanding = Some(OutstandingPing {
                    id,
                    deadline: Instant::now() + self.config.pong_timeout,
                });
            }
            Err(e) => {
                debug!(ping_id = id, "failed to send ping: {}", e);
                self.shared.transition(ConnectivityState::Offline);
            }
        }
    }

    fn handle_frame(&mut self, text: &str) {
        let Some(message) = SocketMessage::parse(text) else {
            trace!("ignoring non-heartbeat frame");
            return;
        };
        if !matches!(message, SocketMessage::Pong { .. }) {
            return;
        }

        match self.outstanding {
            Some(ping) if message.answers(ping.id) => {
                trace!(ping_id = ping.id, "pong received");
                self.outstanding = None;
                self.shared.transition(ConnectivityState::Online);
            }
            _ => debug!(?message, "ignoring stale pong"),
        }
    }

    /// The socket stopped being usable.
    fn lose(&mut self, next: ConnectivityState) {
        self.open = false;
        self.outstanding = None;
        self.shared.transition(next);
    }
}
