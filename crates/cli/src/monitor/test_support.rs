// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mock probe and socket for monitor tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use outbox_core::{CallOutcome, ConnectivityState};
use tokio::sync::mpsc;

use super::{ConnectivityMonitor, HealthProbe};
use crate::transport::{SocketEvent, SocketReceiver, SocketSender, TransportError, TransportResult};

/// Probe returning scripted outcomes, then repeating `fallback`.
#[derive(Clone)]
pub struct MockProbe {
    script: Arc<Mutex<VecDeque<CallOutcome>>>,
    fallback: CallOutcome,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl MockProbe {
    pub fn always(outcome: CallOutcome) -> Self {
        MockProbe {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: outcome,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn scripted(outcomes: impl IntoIterator<Item = CallOutcome>, fallback: CallOutcome) -> Self {
        let probe = Self::always(fallback);
        probe.script.lock().unwrap().extend(outcomes);
        probe
    }

    /// Each check takes `delay` to complete.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HealthProbe for MockProbe {
    fn check(&self) -> Pin<Box<dyn Future<Output = CallOutcome> + Send + '_>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or(self.fallback)
        })
    }
}

/// Test-side handle of a mock socket.
pub struct MockSocket {
    events: mpsc::UnboundedSender<SocketEvent>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl MockSocket {
    /// Create a socket and the halves to hand to the monitor.
    pub fn new() -> (Self, MockSender, MockReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sent = Arc::new(Mutex::new(Vec::new()));
        let socket = MockSocket {
            events: tx,
            sent: Arc::clone(&sent),
        };
        (socket, MockSender { sent, fail: false }, MockReceiver { events: rx })
    }

    pub fn emit(&self, event: SocketEvent) {
        let _ = self.events.send(event);
    }

    pub fn open(&self) {
        self.emit(SocketEvent::Open);
    }

    pub fn message(&self, text: &str) {
        self.emit(SocketEvent::Message(text.to_string()));
    }

    /// Every frame the monitor has sent so far.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

pub struct MockSender {
    sent: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockSender {
    /// Make every send fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl SocketSender for MockSender {
    fn send_text(
        &mut self,
        text: String,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            if self.fail {
                return Err(TransportError::SendFailed("mock send failure".to_string()));
            }
            self.sent.lock().unwrap().push(text);
            Ok(())
        })
    }
}

pub struct MockReceiver {
    events: mpsc::UnboundedReceiver<SocketEvent>,
}

impl SocketReceiver for MockReceiver {
    fn next_event(&mut self) -> Pin<Box<dyn Future<Output = Option<SocketEvent>> + Send + '_>> {
        Box::pin(async move { self.events.recv().await })
    }
}

/// Collect every state a monitor broadcasts.
pub fn record_transitions(monitor: &ConnectivityMonitor) -> Arc<Mutex<Vec<ConnectivityState>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    monitor.subscribe(move |state| sink.lock().unwrap().push(state));
    seen
}

/// Let spawned tasks run until they block again.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
