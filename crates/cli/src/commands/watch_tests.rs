// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use outbox_core::{Method, Mutation};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::commands::testing::{closed_base_url, output, test_config};
use crate::queue::QueueStore;

#[tokio::test]
async fn watch_reports_online_and_drains_queue() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &server.uri());
    let store = open_store(&config).unwrap();
    store.enqueue(Mutation::new(Method::Post, "/items").unwrap()).await.unwrap();
    let mut out = Vec::new();

    let watched = store.clone();
    run_until(&config, &mut out, async move {
        for _ in 0..100 {
            if watched.list_all().await.unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap();

    assert!(output(&out).trim_end().ends_with("online"));
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn watch_keeps_queue_while_offline() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &closed_base_url());
    let store = open_store(&config).unwrap();
    store.enqueue(Mutation::new(Method::Post, "/items").unwrap()).await.unwrap();
    let mut out = Vec::new();

    run_until(&config, &mut out, tokio::time::sleep(Duration::from_millis(300)))
        .await
        .unwrap();

    assert!(output(&out).trim_end().ends_with("offline"));
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_socket_falls_back_to_probing() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir, &closed_base_url());
    config.socket_url = Some(closed_base_url().replace("http://", "ws://"));
    let mut out = Vec::new();

    run_until(&config, &mut out, tokio::time::sleep(Duration::from_millis(300)))
        .await
        .unwrap();

    assert!(output(&out).contains("offline"));
}
