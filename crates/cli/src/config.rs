// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is stored in `outbox.toml` and includes:
//! - where the backend lives (`base_url`, `health_path`, `socket_url`)
//! - heartbeat timing for the HTTP probe and the WebSocket ping
//! - where the queue is stored and when queued records are discarded
//!
//! Every field has a default, so an empty or missing file is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::monitor::{HealthCheckConfig, HeartbeatConfig};
use crate::sync::DiscardPolicy;

const CONFIG_FILE_NAME: &str = "outbox.toml";
const APP_DIR_NAME: &str = "outbox";
const QUEUE_FILE_NAME: &str = "queue.jsonl";

/// Client configuration stored in `outbox.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend origin that mutations are replayed against.
    pub base_url: String,
    /// Health endpoint, relative to `base_url`.
    pub health_path: String,
    /// WebSocket endpoint for ping/pong heartbeats (`ws://` or `wss://`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_url: Option<String>,
    /// Time between health probes in milliseconds (default: 30000).
    pub probe_interval_ms: u64,
    /// Max time a health probe may take in milliseconds (default: 5000).
    pub probe_timeout_ms: u64,
    /// Time between pings in milliseconds (default: 15000).
    pub ping_interval_ms: u64,
    /// Max time to wait for a pong in milliseconds (default: 3000).
    pub pong_timeout_ms: u64,
    /// Max time a replayed request may take in milliseconds (default: 10000).
    pub request_timeout_ms: u64,
    /// Queue file location (default: `$XDG_DATA_HOME/outbox/queue.jsonl`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_path: Option<PathBuf>,
    pub discard: DiscardConfig,
}

/// When queued records are dropped without being applied.
///
/// Both limits are off unless set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscardConfig {
    /// Drop a record after this many rejected replays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    /// Drop a record once it has been queued this long.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "http://localhost:8080".to_string(),
            health_path: "/health".to_string(),
            socket_url: None,
            probe_interval_ms: 30_000,
            probe_timeout_ms: 5_000,
            ping_interval_ms: 15_000,
            pong_timeout_ms: 3_000,
            request_timeout_ms: 10_000,
            queue_path: None,
            discard: DiscardConfig::default(),
        }
    }
}

impl Config {
    /// Loads and validates configuration from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the first configuration found, or the defaults.
    ///
    /// An explicit path must exist. Otherwise `./outbox.toml` is tried, then
    /// the user config directory.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(Error::ConfigNotFound(path.display().to_string()));
            }
            return Self::load(path);
        }
        match find_config_file() {
            Some(path) => Self::load(&path),
            None => Ok(Config::default()),
        }
    }

    /// Checks timings and URLs.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        if !self.health_path.starts_with('/') {
            return Err(Error::InvalidConfig(format!(
                "health_path '{}' must start with '/'",
                self.health_path
            )));
        }
        if let Some(url) = &self.socket_url {
            if !(url.starts_with("ws://") || url.starts_with("wss://")) {
                return Err(Error::InvalidConfig(format!(
                    "socket_url '{}' must start with ws:// or wss://",
                    url
                )));
            }
        }

        let timings = [
            ("probe_interval_ms", self.probe_interval_ms),
            ("probe_timeout_ms", self.probe_timeout_ms),
            ("ping_interval_ms", self.ping_interval_ms),
            ("pong_timeout_ms", self.pong_timeout_ms),
            ("request_timeout_ms", self.request_timeout_ms),
        ];
        if let Some((name, _)) = timings.iter().find(|(_, ms)| *ms == 0) {
            return Err(Error::InvalidConfig(format!("{} must be greater than 0", name)));
        }
        if self.pong_timeout_ms >= self.ping_interval_ms {
            return Err(Error::InvalidConfig(format!(
                "pong_timeout_ms ({}) must be shorter than ping_interval_ms ({})",
                self.pong_timeout_ms, self.ping_interval_ms
            )));
        }
        Ok(())
    }

    /// Full URL of the health endpoint.
    pub fn health_url(&self) -> String {
        crate::http::join_url(&self.base_url, &self.health_path)
    }

    pub fn health_check(&self) -> HealthCheckConfig {
        HealthCheckConfig {
            interval: Duration::from_millis(self.probe_interval_ms),
            timeout: Duration::from_millis(self.probe_timeout_ms),
        }
    }

    pub fn heartbeat(&self) -> HeartbeatConfig {
        HeartbeatConfig {
            ping_interval: Duration::from_millis(self.ping_interval_ms),
            pong_timeout: Duration::from_millis(self.pong_timeout_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn discard_policy(&self) -> DiscardPolicy {
        DiscardPolicy {
            max_attempts: self.discard.max_attempts,
            max_age: self.discard.max_age_secs.map(Duration::from_secs),
        }
    }

    /// Where the queue file lives.
    pub fn queue_path(&self) -> PathBuf {
        match &self.queue_path {
            Some(path) => path.clone(),
            None => default_queue_path(),
        }
    }
}

/// First config file found in the working directory or the user config
/// directory.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    let user = dirs::config_dir()?.join(APP_DIR_NAME).join("config.toml");
    user.is_file().then_some(user)
}

/// `$XDG_DATA_HOME/outbox/queue.jsonl`, or a local `.outbox/` when there is
/// no data directory.
pub fn default_queue_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".outbox"))
        .join(QUEUE_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
