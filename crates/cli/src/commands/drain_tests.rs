// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use outbox_core::{Method, Mutation};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::commands::testing::{closed_base_url, output, test_config};
use crate::queue::QueueStore;

#[tokio::test]
async fn drain_replays_against_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(422))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &server.uri());
    let store = open_store(&config).unwrap();
    store.enqueue(Mutation::new(Method::Post, "/ok").unwrap()).await.unwrap();
    store.enqueue(Mutation::new(Method::Post, "/bad").unwrap()).await.unwrap();
    let mut out = Vec::new();

    run(&config, OutputFormat::Text, &mut out).await.unwrap();

    assert_eq!(output(&out), "replayed 1, rejected 1, discarded 0, 1 remaining\n");
    let left = store.list_all().await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].payload.path, "/bad");
    assert_eq!(left[0].attempts, 1);
}

#[tokio::test]
async fn unreachable_backend_reports_interruption() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &closed_base_url());
    let store = open_store(&config).unwrap();
    store.enqueue(Mutation::new(Method::Post, "/a").unwrap()).await.unwrap();
    store.enqueue(Mutation::new(Method::Post, "/b").unwrap()).await.unwrap();
    let mut out = Vec::new();

    run(&config, OutputFormat::Json, &mut out).await.unwrap();

    let value: serde_json::Value = serde_json::from_str(&output(&out)).unwrap();
    assert_eq!(value["interrupted"], true);
    assert_eq!(value["remaining"], 2);
    assert_eq!(store.list_all().await.unwrap().len(), 2);
}
