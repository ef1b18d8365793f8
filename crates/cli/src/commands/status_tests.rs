// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use outbox_core::{Method, Mutation};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::commands::testing::{closed_base_url, output, test_config};

#[tokio::test]
async fn healthy_backend_is_online() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &server.uri());
    open_store(&config)
        .unwrap()
        .enqueue(Mutation::new(Method::Post, "/a").unwrap())
        .await
        .unwrap();
    let mut out = Vec::new();

    run(&config, OutputFormat::Text, &mut out).await.unwrap();

    let text = output(&out);
    assert!(text.starts_with("online ("));
    assert!(text.ends_with("1 queued\n"));
}

#[tokio::test]
async fn unreachable_backend_is_offline() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &closed_base_url());
    let mut out = Vec::new();

    run(&config, OutputFormat::Json, &mut out).await.unwrap();

    let value: serde_json::Value = serde_json::from_str(&output(&out)).unwrap();
    assert_eq!(value["state"], "offline");
    assert_eq!(value["pending"], 0);
}

#[tokio::test]
async fn server_error_is_error_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &server.uri());
    let mut out = Vec::new();

    run(&config, OutputFormat::Json, &mut out).await.unwrap();

    let value: serde_json::Value = serde_json::from_str(&output(&out)).unwrap();
    assert_eq!(value["state"], "error");
}
