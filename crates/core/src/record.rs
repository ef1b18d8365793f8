// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Buffered mutation records.
//!
//! A [`QueueRecord`] wraps one state-changing request that failed because
//! the backend was unreachable. The record's body is opaque to the queue and
//! the sync engine; only the method and path are needed to replay it against
//! the endpoint the original request targeted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Prefix for all record IDs.
const RECORD_ID_PREFIX: &str = "mq";

/// HTTP methods that change server state and may therefore be queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Returns the canonical upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// A state-changing request, as the API client originally attempted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    pub method: Method,
    /// Path relative to the backend origin, starting with `/`.
    pub path: String,
    /// Request body. Never inspected by the queue or the sync engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl Mutation {
    /// Creates a mutation without a body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if `path` does not start with `/`.
    pub fn new(method: Method, path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(Error::InvalidPath(path));
        }
        Ok(Mutation {
            method,
            path,
            body: None,
        })
    }

    /// Attaches a request body.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// One buffered mutation awaiting replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueRecord {
    /// Unique, stable across reloads.
    pub id: String,
    pub payload: Mutation,
    pub created_at: DateTime<Utc>,
    /// Number of replays the backend has rejected so far.
    #[serde(default)]
    pub attempts: u32,
}

impl QueueRecord {
    /// Creates a fresh record with zero attempts.
    pub fn new(id: String, payload: Mutation, created_at: DateTime<Utc>) -> Self {
        QueueRecord {
            id,
            payload,
            created_at,
            attempts: 0,
        }
    }

    /// Age of the record relative to `now`. Never negative.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        (now - self.created_at).max(chrono::Duration::zero())
    }

    /// Serializes the record as a single JSON line.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes a record from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Generate a record ID from the payload and creation time.
/// Format: `mq-{hash}` where hash is the first 12 hex chars of
/// SHA256(method + path + body + timestamp).
pub fn generate_record_id(payload: &Mutation, created_at: &DateTime<Utc>) -> String {
    let body = payload
        .body
        .as_ref()
        .map(|b| b.to_string())
        .unwrap_or_default();
    let input = format!(
        "{}{}{}{}",
        payload.method,
        payload.path,
        body,
        created_at.to_rfc3339_opts(SecondsFormat::Nanos, true)
    );
    let hash = Sha256::digest(input.as_bytes());
    format!("{}-{}", RECORD_ID_PREFIX, hex::encode(&hash[..6]))
}

/// Generate a unique record ID, handling collisions by appending an
/// incrementing suffix.
pub fn generate_unique_record_id<F>(
    payload: &Mutation,
    created_at: &DateTime<Utc>,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let base_id = generate_record_id(payload, created_at);

    if !exists(&base_id) {
        return base_id;
    }

    let mut suffix = 2;
    loop {
        let id = format!("{}-{}", base_id, suffix);
        if !exists(&id) {
            return id;
        }
        suffix += 1;
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
