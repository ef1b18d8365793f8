// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::commands::testing::{output, test_config};

#[tokio::test]
async fn enqueue_prints_id_and_persists_record() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, "http://localhost:1");
    let mut out = Vec::new();

    run(&config, Method::Post, "/items".to_string(), Some(r#"{"n":1}"#.to_string()), &mut out)
        .await
        .unwrap();

    let id = output(&out).trim().to_string();
    assert!(id.starts_with("mq-"));
    let records = open_store(&config).unwrap().list_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].payload.body, Some(json!({"n": 1})));
    assert_eq!(records[0].attempts, 0);
}

#[tokio::test]
async fn enqueue_with_bad_body_stores_nothing() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, "http://localhost:1");
    let mut out = Vec::new();

    let result = run(&config, Method::Post, "/items".to_string(), Some("nope".to_string()), &mut out).await;

    assert!(result.is_err());
    assert!(out.is_empty());
    assert!(!config.queue_path().exists());
}
