// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Submitting mutations to the backend.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use outbox_core::{classify, CallOutcome, FailureKind, Method, Mutation};
use tracing::debug;

use crate::http;

/// Why a replay did not apply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// No response arrived.
    #[error("backend unreachable: {0}")]
    ConnectivityLost(String),

    /// The backend answered and declined the mutation.
    #[error("backend rejected mutation with status {status}")]
    ServerRejected { status: u16 },

    /// The request could not be made at all.
    #[error("replay failed: {0}")]
    Other(String),
}

impl ReplayError {
    /// Classify this error for the retry policy.
    pub fn kind(&self) -> FailureKind {
        match self {
            ReplayError::ConnectivityLost(_) => FailureKind::ConnectivityLost,
            ReplayError::ServerRejected { .. } => FailureKind::ServerRejected,
            ReplayError::Other(_) => FailureKind::Other,
        }
    }

    /// Turn a call outcome into a replay result.
    pub fn check(outcome: CallOutcome, detail: impl FnOnce() -> String) -> Result<(), ReplayError> {
        match (classify(&outcome), outcome) {
            (None, _) => Ok(()),
            (Some(FailureKind::ServerRejected), CallOutcome::Response { status }) => {
                Err(ReplayError::ServerRejected { status })
            }
            (Some(FailureKind::ConnectivityLost), _) => {
                Err(ReplayError::ConnectivityLost(detail()))
            }
            (Some(_), _) => Err(ReplayError::Other(detail())),
        }
    }
}

/// Submits a mutation to the endpoint it originally targeted.
pub trait Replayer: Send + Sync {
    /// Attempt the mutation once.
    fn replay<'a>(
        &'a self,
        mutation: &'a Mutation,
    ) -> Pin<Box<dyn Future<Output = Result<(), ReplayError>> + Send + 'a>>;
}

/// Replays mutations over HTTP.
///
/// The body is forwarded as JSON without inspection.
pub struct HttpReplayer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReplayer {
    /// Replay against `base_url`, giving up on each request after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(HttpReplayer {
            client: http::build_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Replayer for HttpReplayer {
    fn replay<'a>(
        &'a self,
        mutation: &'a Mutation,
    ) -> Pin<Box<dyn Future<Output = Result<(), ReplayError>> + Send + 'a>> {
        Box::pin(async move {
            let url = http::join_url(&self.base_url, &mutation.path);
            let mut request = self.client.request(http_method(mutation.method), &url);
            if let Some(body) = &mutation.body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => {
                    let outcome = http::outcome_from_response(&response);
                    debug!(method = %mutation.method, %url, ?outcome, "replayed");
                    ReplayError::check(outcome, || format!("{} {}", mutation.method, url))
                }
                Err(e) => {
                    debug!(method = %mutation.method, %url, "replay failed: {}", e);
                    ReplayError::check(http::outcome_from_error(&e), || e.to_string())
                }
            }
        })
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}
