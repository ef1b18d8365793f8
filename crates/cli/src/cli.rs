// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use outbox_core::Method;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "outbox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first mutation queue with connectivity monitoring")]
#[command(
    long_about = "Offline-first mutation queue with connectivity monitoring.\n\n\
    Mutations that fail because the backend is unreachable are queued on disk \
    and replayed in order once the backend is reachable again."
)]
pub struct Cli {
    /// Path to the config file (default: ./outbox.toml, then the user config dir)
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Probe the backend once and show connectivity
    #[command(after_help = "\
Examples:
  outbox status              Show state and queue depth
  outbox status -o json      Machine-readable status")]
    Status {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Monitor connectivity and drain the queue whenever the backend comes back
    #[command(after_help = "\
Examples:
  outbox watch               Run until Ctrl-C
  RUST_LOG=debug outbox watch  Show every probe and ping")]
    Watch,

    /// Queue a mutation without trying it first
    #[command(after_help = "\
Examples:
  outbox enqueue POST /items --body '{\"name\":\"x\"}'
  outbox enqueue DELETE /items/7")]
    Enqueue {
        /// HTTP method (POST, PUT, PATCH, DELETE)
        method: Method,
        /// Path relative to base_url, starting with '/'
        path: String,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },

    /// Send a mutation now, queueing it if the backend is unreachable
    #[command(after_help = "\
Examples:
  outbox submit PUT /items/7 --body '{\"name\":\"y\"}'")]
    Submit {
        /// HTTP method (POST, PUT, PATCH, DELETE)
        method: Method,
        /// Path relative to base_url, starting with '/'
        path: String,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },

    /// List queued mutations in replay order
    List {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Replay queued mutations now
    Drain {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Drop queued mutations without replaying them
    Discard {
        /// Record IDs (see 'outbox list')
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
