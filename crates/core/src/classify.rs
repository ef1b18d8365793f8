// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Failure classification at the API-call boundary.
//!
//! Callers describe what happened to a network call as a [`CallOutcome`];
//! the pure functions here decide what that means for the queue
//! ([`classify`]) and for the connectivity state ([`probe_state`]). Nothing
//! in this module depends on a particular HTTP client.

use std::fmt;

use crate::state::ConnectivityState;

/// What a single network call produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// The server answered with this HTTP status.
    Response { status: u16 },
    /// No response arrived: refused, reset, DNS failure, or timed out.
    NoResponse,
    /// The call failed locally before or after talking to the network,
    /// e.g. a response that could not be decoded.
    LocalFailure,
}

impl CallOutcome {
    /// Returns true if the server answered with a 2xx status.
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Response { status } if (200..300).contains(status))
    }
}

/// Failure taxonomy shared by the queue, the sync engine, and callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The backend is unreachable. The only kind that is enqueued.
    ConnectivityLost,
    /// The backend answered and declined the operation.
    ServerRejected,
    /// The local queue store could not complete an operation.
    StorageFailure,
    /// Anything else.
    Other,
}

impl FailureKind {
    /// Returns true if a mutation failing this way belongs in the queue.
    pub fn should_enqueue(&self) -> bool {
        matches!(self, FailureKind::ConnectivityLost)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ConnectivityLost => "connectivity_lost",
            FailureKind::ServerRejected => "server_rejected",
            FailureKind::StorageFailure => "storage_failure",
            FailureKind::Other => "other",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies a call outcome. Returns `None` on success.
pub fn classify(outcome: &CallOutcome) -> Option<FailureKind> {
    match outcome {
        _ if outcome.is_success() => None,
        CallOutcome::Response { .. } => Some(FailureKind::ServerRejected),
        CallOutcome::NoResponse => Some(FailureKind::ConnectivityLost),
        CallOutcome::LocalFailure => Some(FailureKind::Other),
    }
}

/// Maps a health-probe outcome to the connectivity state it implies.
///
/// Only a success-range response means `Online` and only a missing response
/// means `Offline`. Everything ambiguous resolves to `Error` so the user
/// never sees a false `Online`.
pub fn probe_state(outcome: &CallOutcome) -> ConnectivityState {
    match outcome {
        _ if outcome.is_success() => ConnectivityState::Online,
        CallOutcome::NoResponse => ConnectivityState::Offline,
        CallOutcome::Response { .. } | CallOutcome::LocalFailure => ConnectivityState::Error,
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
