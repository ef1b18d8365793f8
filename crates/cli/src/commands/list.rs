// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use chrono::Utc;
use outbox_core::QueueRecord;

use super::open_store;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::queue::QueueStore;

pub async fn run(config: &Config, output: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let store = open_store(config)?;
    let records = store.list_all().await?;

    match output {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&records)?)?;
        }
        OutputFormat::Text => {
            if records.is_empty() {
                writeln!(out, "queue is empty")?;
            }
            for record in &records {
                writeln!(out, "{}", format_record(record))?;
            }
        }
    }
    Ok(())
}

/// One line per record: id, method, path, attempts and age.
fn format_record(record: &QueueRecord) -> String {
    let age = record.age(Utc::now());
    format!(
        "{}  {:<6} {}  attempts={}  age={}",
        record.id,
        record.payload.method,
        record.payload.path,
        record.attempts,
        format_age(age)
    )
}

fn format_age(age: chrono::Duration) -> String {
    let secs = age.num_seconds();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86_400)
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
