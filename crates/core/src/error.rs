// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for outbox-core operations.

use thiserror::Error;

/// All possible errors that can occur in outbox-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid connectivity state: '{0}'\n  hint: valid states are: unknown, connecting, online, offline, error")]
    InvalidState(String),

    #[error("invalid method: '{0}'\n  hint: valid methods are: POST, PUT, PATCH, DELETE")]
    InvalidMethod(String),

    #[error("invalid path: '{0}'\n  hint: mutation paths must start with '/'")]
    InvalidPath(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for outbox-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
