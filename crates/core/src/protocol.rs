// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket heartbeat messages.
//!
//! Only two shapes matter to the connectivity monitor:
//! - `{"type":"ping"}` sent by the client
//! - `{"type":"pong"}` expected back from the server
//!
//! Both may carry an `id` used to correlate a pong with the ping it answers.
//! Every other frame on the socket belongs to other consumers and is ignored.

use serde::{Deserialize, Serialize};

/// Heartbeat frames exchanged over the WebSocket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SocketMessage {
    /// Client keepalive probe.
    Ping {
        /// Sequence number echoed by servers that support correlation.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
    },

    /// Server response to a ping.
    Pong {
        /// Echoed from the ping, if the server supports correlation.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
    },
}

impl SocketMessage {
    /// Creates a Ping message tagged with a sequence number.
    pub fn ping(id: u64) -> Self {
        SocketMessage::Ping { id: Some(id) }
    }

    /// Creates a Pong message answering the given ping.
    pub fn pong(id: Option<u64>) -> Self {
        SocketMessage::Pong { id }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Parses a frame, returning `None` for anything that is not a heartbeat.
    ///
    /// Malformed JSON and foreign message types are both `None`; neither is
    /// an error from the monitor's point of view.
    pub fn parse(text: &str) -> Option<Self> {
        Self::from_json(text).ok()
    }

    /// Returns true if this pong answers the ping tagged `outstanding`.
    ///
    /// A pong without an id is attributed to whichever ping is outstanding.
    pub fn answers(&self, outstanding: u64) -> bool {
        match self {
            SocketMessage::Pong { id: Some(id) } => *id == outstanding,
            SocketMessage::Pong { id: None } => true,
            SocketMessage::Ping { .. } => false,
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
