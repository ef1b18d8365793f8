// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outbox - offline-first mutation queue with connectivity monitoring.
//!
//! This crate provides the library behind the `outbox` CLI: it tracks whether
//! the backend is reachable and buffers state-changing requests made while it
//! is not, replaying them once it is.
//!
//! # Main Components
//!
//! - [`ConnectivityMonitor`] - single source of truth for connectivity,
//!   fed by HTTP health probes and WebSocket ping/pong
//! - [`QueueStore`] - durable FIFO of queued mutations ([`JsonlQueueStore`])
//! - [`SyncEngine`] - single-flight replay of the queue
//! - [`Config`] - `outbox.toml` settings
//! - [`Error`] - Error types for all operations
//!
//! # Wiring
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use outbox::{Config, ConnectivityMonitor, HttpProbe, HttpReplayer, JsonlQueueStore, SyncEngine};
//!
//! let config = Config::resolve(None)?;
//! let store = Arc::new(JsonlQueueStore::open(&config.queue_path())?);
//! let replayer = Arc::new(HttpReplayer::new(config.base_url.clone(), config.request_timeout())?);
//! let engine = SyncEngine::new(store, replayer, config.discard_policy());
//!
//! let monitor = ConnectivityMonitor::new();
//! let _drains = engine.drain_on_reconnect(&monitor);
//! let probe = HttpProbe::new(config.health_url(), config.health_check().timeout)?;
//! let _health = monitor.start_health_checks(probe, config.health_check());
//! ```

mod cli;
mod commands;
mod http;

pub mod config;
pub mod error;
pub mod monitor;
pub mod queue;
pub mod sync;
pub mod transport;

pub use cli::{Cli, Command, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};
pub use monitor::{
    ConnectivityMonitor, HealthCheckConfig, HealthCheckGuard, HealthProbe, HeartbeatConfig,
    HttpProbe, SocketGuard, Subscription,
};
pub use queue::{JsonlQueueStore, MemoryQueueStore, QueueError, QueueStore};
pub use sync::{DrainReport, HttpReplayer, Replayer, SyncEngine};
pub use transport::WebSocketTransport;

/// Execute a CLI invocation. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.config.as_deref())?;
    let rt = tokio::runtime::Runtime::new()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    rt.block_on(dispatch(&config, cli.command, &mut out))
}

async fn dispatch(config: &Config, command: Command, out: &mut dyn std::io::Write) -> Result<()> {
    match command {
        Command::Status { output } => commands::status::run(config, output, out).await,
        Command::Watch => commands::watch::run(config, out).await,
        Command::Enqueue { method, path, body } => {
            commands::enqueue::run(config, method, path, body, out).await
        }
        Command::Submit { method, path, body } => {
            commands::submit::run(config, method, path, body, out).await
        }
        Command::List { output } => commands::list::run(config, output, out).await,
        Command::Drain { output } => commands::drain::run(config, output, out).await,
        Command::Discard { ids } => commands::discard::run(config, &ids, out).await,
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
