// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    invalid_state = { Error::InvalidState("flapping".into()), "flapping" },
    invalid_method = { Error::InvalidMethod("GET".into()), "GET" },
    invalid_path = { Error::InvalidPath("items".into()), "must start with '/'" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_invalid_state_lists_valid_states() {
    let msg = Error::InvalidState("up".into()).to_string();
    assert!(msg.contains("online"));
    assert!(msg.contains("offline"));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
