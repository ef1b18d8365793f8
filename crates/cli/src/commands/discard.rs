// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use tracing::warn;

use super::open_store;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::queue::QueueStore;

/// Remove records by ID. Every ID is checked before anything is removed.
pub async fn run(config: &Config, ids: &[String], out: &mut dyn Write) -> Result<()> {
    let store = open_store(config)?;
    let records = store.list_all().await?;

    if let Some(missing) = ids.iter().find(|id| !records.iter().any(|r| &r.id == *id)) {
        return Err(Error::RecordNotFound(missing.clone()));
    }

    for id in ids {
        store.remove(id).await?;
        warn!(id = %id, "queued mutation discarded by operator");
        writeln!(out, "discarded {}", id)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "discard_tests.rs"]
mod tests;
