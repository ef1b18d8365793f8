// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity state values.
//!
//! Exactly one state is current for a monitor at any time. The monitor
//! starts in [`ConnectivityState::Unknown`] and never returns to it; every
//! other state is reachable from every other state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Reachability of the backend as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityState {
    /// Nothing has been observed yet. Only valid at startup.
    #[default]
    Unknown,
    /// The socket opened but no heartbeat has been answered yet.
    Connecting,
    /// The backend answered a heartbeat.
    Online,
    /// The backend could not be reached.
    Offline,
    /// The backend or the socket reported a failure other than unreachability.
    Error,
}

impl ConnectivityState {
    /// All states, in encoding order.
    pub const ALL: [ConnectivityState; 5] = [
        ConnectivityState::Unknown,
        ConnectivityState::Connecting,
        ConnectivityState::Online,
        ConnectivityState::Offline,
        ConnectivityState::Error,
    ];

    /// Returns the string representation used in logs and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectivityState::Unknown => "unknown",
            ConnectivityState::Connecting => "connecting",
            ConnectivityState::Online => "online",
            ConnectivityState::Offline => "offline",
            ConnectivityState::Error => "error",
        }
    }

    /// Compact encoding for storage in an atomic.
    pub fn to_u8(self) -> u8 {
        match self {
            ConnectivityState::Unknown => 0,
            ConnectivityState::Connecting => 1,
            ConnectivityState::Online => 2,
            ConnectivityState::Offline => 3,
            ConnectivityState::Error => 4,
        }
    }

    /// Decodes a value produced by [`ConnectivityState::to_u8`].
    ///
    /// Unrecognized values decode to `Unknown`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectivityState::Connecting,
            2 => ConnectivityState::Online,
            3 => ConnectivityState::Offline,
            4 => ConnectivityState::Error,
            _ => ConnectivityState::Unknown,
        }
    }

    /// Returns true if the backend is known to be reachable.
    pub fn is_online(&self) -> bool {
        matches!(self, ConnectivityState::Online)
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConnectivityState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "unknown" => Ok(ConnectivityState::Unknown),
            "connecting" => Ok(ConnectivityState::Connecting),
            "online" => Ok(ConnectivityState::Online),
            "offline" => Ok(ConnectivityState::Offline),
            "error" => Ok(ConnectivityState::Error),
            _ => Err(Error::InvalidState(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
