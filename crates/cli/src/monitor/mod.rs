// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitor.
//!
//! Maintains the single authoritative [`ConnectivityState`] for a client and
//! broadcasts every change to subscribers.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   probe result   ┌────────────────────┐
//! │ health task  │─────────────────►│                    │   transition   ┌───────────┐
//! │ (HTTP GET)   │                  │ ConnectivityMonitor│───────────────►│ listeners │
//! └──────────────┘                  │   (atomic state)   │                └───────────┘
//! ┌──────────────┐  open/close/pong │                    │
//! │ socket task  │─────────────────►│                    │
//! │ (ping/pong)  │                  └────────────────────┘
//! └──────────────┘
//! ```
//!
//! Each background task is owned by a guard returned from
//! [`ConnectivityMonitor::start_health_checks`] or
//! [`ConnectivityMonitor::attach_socket`]. Tearing down a guard, or
//! disposing the monitor, cancels its timers and stops the task.

mod health;
mod socket;

pub use health::{HealthCheckConfig, HealthCheckGuard, HealthProbe, HttpProbe};
pub use socket::{HeartbeatConfig, SocketGuard};

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use outbox_core::ConnectivityState;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::transport::{SocketReceiver, SocketSender};

/// Callback invoked with the new state on every transition.
type Listener = Arc<dyn Fn(ConnectivityState) + Send + Sync>;

/// Owns the connectivity state and its listeners.
///
/// Monitors are independent: there is no process-wide state, so several can
/// coexist. Dropping the monitor disposes it.
pub struct ConnectivityMonitor {
    shared: Arc<MonitorShared>,
}

/// State shared between the monitor, its tasks and its subscriptions.
pub(crate) struct MonitorShared {
    /// Current state (atomic for lock-free reads).
    state: AtomicU8,
    /// Registered listeners, keyed by registration ID.
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
    /// Held for the whole of a transition so listeners observe transitions
    /// in the order they happened.
    dispatch: Mutex<()>,
    /// Parent of every task's cancellation token.
    cancel: CancellationToken,
}

impl ConnectivityMonitor {
    /// Create a monitor in the `Unknown` state.
    pub fn new() -> Self {
        ConnectivityMonitor {
            shared: Arc::new(MonitorShared {
                state: AtomicU8::new(ConnectivityState::Unknown.to_u8()),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
                dispatch: Mutex::new(()),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Current state. Pure read.
    pub fn status(&self) -> ConnectivityState {
        self.shared.status()
    }

    /// Register `listener` to be called with the new state on every
    /// transition.
    ///
    /// Re-affirming the current state does not notify, and a listener never
    /// receives transitions that completed before it was registered.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(ConnectivityState) + Send + Sync + 'static,
    {
        let id = self.shared.next_listener_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.shared.listeners).push((id, Arc::new(listener)));
        debug!(listener = id, "subscribed");

        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.shared.listeners).len()
    }

    /// Start periodic HTTP reachability probing.
    pub fn start_health_checks<P>(&self, probe: P, config: HealthCheckConfig) -> HealthCheckGuard
    where
        P: HealthProbe + 'static,
    {
        health::spawn(
            Arc::clone(&self.shared),
            probe,
            config,
            self.shared.cancel.child_token(),
        )
    }

    /// Start WebSocket-based monitoring on an already-created socket.
    pub fn attach_socket<Tx, Rx>(&self, sender: Tx, receiver: Rx, config: HeartbeatConfig) -> SocketGuard
    where
        Tx: SocketSender + 'static,
        Rx: SocketReceiver + 'static,
    {
        socket::spawn(
            Arc::clone(&self.shared),
            sender,
            receiver,
            config,
            self.shared.cancel.child_token(),
        )
    }

    /// Stop every task started by this monitor and drop all listeners.
    ///
    /// Idempotent. The state is frozen at its last value.
    pub fn dispose(&self) {
        if !self.shared.cancel.is_cancelled() {
            debug!("disposing connectivity monitor");
        }
        self.shared.cancel.cancel();
        lock(&self.shared.listeners).clear();
    }

    /// Returns true once [`ConnectivityMonitor::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    #[cfg(test)]
    pub(crate) fn shared(&self) -> &Arc<MonitorShared> {
        &self.shared
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl MonitorShared {
    pub(crate) fn status(&self) -> ConnectivityState {
        ConnectivityState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Move to `next`, notifying listeners if the state changed.
    ///
    /// Returns true if a transition happened.
    pub(crate) fn transition(&self, next: ConnectivityState) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }

        let _dispatch = lock(&self.dispatch);
        let prev = ConnectivityState::from_u8(self.state.swap(next.to_u8(), Ordering::AcqRel));
        if prev == next {
            return false;
        }

        info!(from = %prev, to = %next, "connectivity changed");

        // Snapshot so listeners may subscribe or unsubscribe while we iterate
        let snapshot: Vec<Listener> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(next);
        }
        true
    }

    fn remove_listener(&self, id: u64) {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        if listeners.len() != before {
            debug!(listener = id, "unsubscribed");
        }
    }
}

/// Handle returned by [`ConnectivityMonitor::subscribe`].
///
/// Dropping the handle does not unsubscribe; call
/// [`Subscription::unsubscribe`].
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    shared: Weak<MonitorShared>,
}

impl Subscription {
    /// Remove the listener.
    ///
    /// Idempotent, and safe to call from inside a listener while a
    /// notification is in progress.
    pub fn unsubscribe(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.remove_listener(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}




#[cfg(test)]
pub(crate) mod test_support;
