// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use serde_json::json;

use super::{build_engine, open_store};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::sync::{DrainReport, DrainStatus};

pub async fn run(config: &Config, output: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let engine = build_engine(config, open_store(config)?)?;
    let report = engine.drain().await?;
    write_report(&report, output, out)
}

fn write_report(report: &DrainReport, output: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let interrupted = report.status == DrainStatus::Interrupted;
    match output {
        OutputFormat::Json => {
            let value = json!({
                "replayed": report.replayed,
                "rejected": report.rejected,
                "discarded": report.discarded,
                "remaining": report.remaining,
                "interrupted": interrupted,
            });
            writeln!(out, "{}", value)?;
        }
        OutputFormat::Text => {
            writeln!(
                out,
                "replayed {}, rejected {}, discarded {}, {} remaining",
                report.replayed, report.rejected, report.discarded, report.remaining
            )?;
            if interrupted {
                writeln!(out, "backend became unreachable; drain stopped early")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
