// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use outbox_core::Method;

use super::{open_store, parse_mutation};
use crate::config::Config;
use crate::error::Result;
use crate::queue::QueueStore;

pub async fn run(
    config: &Config,
    method: Method,
    path: String,
    body: Option<String>,
    out: &mut dyn Write,
) -> Result<()> {
    let mutation = parse_mutation(method, path, body.as_deref())?;
    let store = open_store(config)?;
    let record = store.enqueue(mutation).await?;
    writeln!(out, "{}", record.id)?;
    Ok(())
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
