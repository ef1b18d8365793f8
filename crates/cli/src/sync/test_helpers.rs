// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use outbox_core::{Method, Mutation};
use tokio::sync::Semaphore;

use super::{ReplayError, Replayer};

/// Create a POST mutation against `path`.
pub fn mutation(path: &str) -> Mutation {
    Mutation::new(Method::Post, path).unwrap()
}

/// Replayer with per-path scripted results.
///
/// Paths without a script succeed. Every call is recorded.
#[derive(Clone, Default)]
pub struct MockReplayer {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Result<(), ReplayError>>>>>,
    calls: Arc<Mutex<Vec<String>>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockReplayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays block until [`MockReplayer::release`] hands out permits.
    pub fn gated() -> Self {
        MockReplayer {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    /// Queue the results of the next replays of `path`.
    pub fn script(&self, path: &str, results: impl IntoIterator<Item = Result<(), ReplayError>>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .extend(results);
    }

    pub fn reject(&self, path: &str) {
        self.script(path, [Err(ReplayError::ServerRejected { status: 422 })]);
    }

    pub fn unreachable(&self, path: &str) {
        self.script(path, [Err(ReplayError::ConnectivityLost("refused".to_string()))]);
    }

    /// Let `n` blocked replays proceed.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Paths replayed so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Replayer for MockReplayer {
    fn replay<'a>(
        &'a self,
        mutation: &'a Mutation,
    ) -> Pin<Box<dyn Future<Output = Result<(), ReplayError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(mutation.path.clone());
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            let scripted = self
                .scripts
                .lock()
                .unwrap()
                .get_mut(&mutation.path)
                .and_then(VecDeque::pop_front);
            scripted.unwrap_or(Ok(()))
        })
    }
}
