// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    ok = { 200, None },
    created = { 201, None },
    no_content = { 204, None },
    redirect = { 302, Some(FailureKind::ServerRejected) },
    bad_request = { 400, Some(FailureKind::ServerRejected) },
    conflict = { 409, Some(FailureKind::ServerRejected) },
    unprocessable = { 422, Some(FailureKind::ServerRejected) },
    internal = { 500, Some(FailureKind::ServerRejected) },
    unavailable = { 503, Some(FailureKind::ServerRejected) },
)]
fn classify_response(status: u16, expected: Option<FailureKind>) {
    assert_eq!(classify(&CallOutcome::Response { status }), expected);
}

#[test]
fn classify_no_response_is_connectivity_loss() {
    assert_eq!(
        classify(&CallOutcome::NoResponse),
        Some(FailureKind::ConnectivityLost)
    );
}

#[test]
fn classify_local_failure_is_other() {
    assert_eq!(classify(&CallOutcome::LocalFailure), Some(FailureKind::Other));
}

#[test]
fn only_connectivity_loss_is_enqueued() {
    assert!(FailureKind::ConnectivityLost.should_enqueue());
    assert!(!FailureKind::ServerRejected.should_enqueue());
    assert!(!FailureKind::StorageFailure.should_enqueue());
    assert!(!FailureKind::Other.should_enqueue());
}

#[parameterized(
    ok = { CallOutcome::Response { status: 200 }, ConnectivityState::Online },
    no_content = { CallOutcome::Response { status: 204 }, ConnectivityState::Online },
    server_error = { CallOutcome::Response { status: 500 }, ConnectivityState::Error },
    not_found = { CallOutcome::Response { status: 404 }, ConnectivityState::Error },
    refused = { CallOutcome::NoResponse, ConnectivityState::Offline },
    malformed = { CallOutcome::LocalFailure, ConnectivityState::Error },
)]
fn probe_outcome_to_state(outcome: CallOutcome, expected: ConnectivityState) {
    assert_eq!(probe_state(&outcome), expected);
}
