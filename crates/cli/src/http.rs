// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! reqwest glue shared by the health probe and the replayer.
//!
//! Converts reqwest results into [`CallOutcome`] so that everything above
//! this module classifies failures without knowing about the HTTP client.

use std::time::Duration;

use outbox_core::CallOutcome;

/// Build an HTTP client with a per-request timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// Describe a completed request.
pub(crate) fn outcome_from_response(response: &reqwest::Response) -> CallOutcome {
    CallOutcome::Response {
        status: response.status().as_u16(),
    }
}

/// Describe a failed request.
///
/// Connect failures, timeouts and errors while sending mean no response
/// arrived. Everything else (bad URL, undecodable response) is local.
pub(crate) fn outcome_from_error(err: &reqwest::Error) -> CallOutcome {
    if let Some(status) = err.status() {
        return CallOutcome::Response {
            status: status.as_u16(),
        };
    }
    if err.is_connect() || err.is_timeout() || err.is_request() {
        CallOutcome::NoResponse
    } else {
        CallOutcome::LocalFailure
    }
}

/// Join a base URL and an absolute path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
