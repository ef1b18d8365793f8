// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use outbox_core::Method;

use super::{build_engine, open_store, parse_mutation};
use crate::config::Config;
use crate::error::Result;
use crate::sync::Submission;

pub async fn run(
    config: &Config,
    method: Method,
    path: String,
    body: Option<String>,
    out: &mut dyn Write,
) -> Result<()> {
    let mutation = parse_mutation(method, path, body.as_deref())?;
    let engine = build_engine(config, open_store(config)?)?;

    match engine.submit(mutation).await? {
        Submission::Applied => writeln!(out, "applied")?,
        Submission::Queued(record) => writeln!(out, "queued {}", record.id)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
