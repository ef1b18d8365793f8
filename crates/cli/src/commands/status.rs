// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use outbox_core::probe_state;
use serde_json::json;
use tracing::warn;

use super::open_store;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::monitor::{HealthProbe, HttpProbe};
use crate::queue::QueueStore;

/// Probe the health endpoint once and report the state with the queue depth.
///
/// An unreadable queue does not hide the connectivity result; the depth is
/// shown as unknown instead.
pub async fn run(config: &Config, output: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let probe = HttpProbe::new(config.health_url(), config.health_check().timeout)?;
    let state = probe_state(&probe.check().await);

    let pending = match open_store(config) {
        Ok(store) => match store.list_all().await {
            Ok(records) => Some(records.len()),
            Err(e) => {
                warn!("cannot read queue: {}", e);
                None
            }
        },
        Err(e) => {
            warn!("cannot open queue: {}", e);
            None
        }
    };

    match output {
        OutputFormat::Json => {
            let value = json!({
                "state": state,
                "health_url": probe.url(),
                "pending": pending,
            });
            writeln!(out, "{}", value)?;
        }
        OutputFormat::Text => {
            writeln!(out, "{} ({})", state, probe.url())?;
            match pending {
                Some(n) => writeln!(out, "{} queued", n)?,
                None => writeln!(out, "queue unavailable")?,
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
