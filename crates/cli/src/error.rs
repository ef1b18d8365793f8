// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::queue::QueueError;
use crate::sync::SyncError;
use crate::transport::TransportError;

/// All possible errors surfaced by the outbox library and CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("config file not found: {0}\n  hint: create it or drop --config to use the defaults")]
    ConfigNotFound(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("record not found: {0}\n  hint: run 'outbox list' to see queued record IDs")]
    RecordNotFound(String),

    #[error("invalid body: {0}\n  hint: pass the body as JSON, e.g. --body '{{\"name\":\"x\"}}'")]
    InvalidBody(String),

    #[error(transparent)]
    Core(#[from] outbox_core::Error),

    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("socket error: {0}")]
    Transport(#[from] TransportError),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
