// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod discard;
pub mod drain;
pub mod enqueue;
pub mod list;
pub mod status;
pub mod submit;
pub mod watch;

use std::sync::Arc;

use outbox_core::{Method, Mutation};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::queue::{JsonlQueueStore, QueueStore};
use crate::sync::{HttpReplayer, SyncEngine};

/// Open the queue file named by `config`.
pub fn open_store(config: &Config) -> Result<Arc<JsonlQueueStore>> {
    Ok(Arc::new(JsonlQueueStore::open(&config.queue_path())?))
}

/// Build a sync engine over `store` that replays against the configured
/// backend.
pub fn build_engine(config: &Config, store: Arc<dyn QueueStore>) -> Result<SyncEngine> {
    let replayer = HttpReplayer::new(config.base_url.clone(), config.request_timeout())?;
    Ok(SyncEngine::new(
        store,
        Arc::new(replayer),
        config.discard_policy(),
    ))
}

/// Build a mutation from command-line arguments.
pub fn parse_mutation(method: Method, path: String, body: Option<&str>) -> Result<Mutation> {
    let mutation = Mutation::new(method, path)?;
    match body {
        Some(raw) => {
            let value = serde_json::from_str(raw).map_err(|e| Error::InvalidBody(e.to_string()))?;
            Ok(mutation.with_body(value))
        }
        None => Ok(mutation),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
