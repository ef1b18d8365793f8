// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn ping_serializes_with_type_tag() {
    let json = SocketMessage::ping(7).to_json().unwrap();
    assert_eq!(json, r#"{"type":"ping","id":7}"#);
}

#[test]
fn bare_ping_and_pong_parse() {
    assert_eq!(
        SocketMessage::parse(r#"{"type":"ping"}"#),
        Some(SocketMessage::Ping { id: None })
    );
    assert_eq!(
        SocketMessage::parse(r#"{"type":"pong"}"#),
        Some(SocketMessage::Pong { id: None })
    );
}

#[test]
fn pong_with_id_parses() {
    assert_eq!(
        SocketMessage::parse(r#"{"type":"pong","id":42}"#),
        Some(SocketMessage::pong(Some(42)))
    );
}

#[parameterized(
    not_json = { "hello" },
    empty = { "" },
    other_type = { r#"{"type":"chat","text":"hi"}"# },
    no_type = { r#"{"id":1}"# },
    bad_id = { r#"{"type":"pong","id":"abc"}"# },
    array = { "[1,2,3]" },
)]
fn non_heartbeat_frames_are_ignored(text: &str) {
    assert_eq!(SocketMessage::parse(text), None);
}

#[test]
fn pong_answers_matching_ping_only() {
    let pong = SocketMessage::pong(Some(3));
    assert!(pong.answers(3));
    assert!(!pong.answers(4));
}

#[test]
fn untagged_pong_answers_outstanding_ping() {
    assert!(SocketMessage::pong(None).answers(9));
}

#[test]
fn ping_never_answers() {
    assert!(!SocketMessage::ping(1).answers(1));
}
