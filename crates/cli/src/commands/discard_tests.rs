// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use outbox_core::{Method, Mutation};
use tempfile::TempDir;

use super::*;
use crate::commands::testing::{output, test_config};

#[tokio::test]
async fn discard_removes_named_records() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, "http://localhost:1");
    let store = open_store(&config).unwrap();
    let a = store.enqueue(Mutation::new(Method::Post, "/a").unwrap()).await.unwrap();
    let b = store.enqueue(Mutation::new(Method::Post, "/b").unwrap()).await.unwrap();
    let mut out = Vec::new();

    run(&config, std::slice::from_ref(&a.id), &mut out).await.unwrap();

    assert_eq!(output(&out), format!("discarded {}\n", a.id));
    assert_eq!(store.list_all().await.unwrap(), vec![b]);
}

#[tokio::test]
async fn unknown_id_removes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, "http://localhost:1");
    let store = open_store(&config).unwrap();
    let a = store.enqueue(Mutation::new(Method::Post, "/a").unwrap()).await.unwrap();
    let mut out = Vec::new();

    let ids = vec![a.id.clone(), "mq-missing".to_string()];
    let err = run(&config, &ids, &mut out).await.unwrap_err();

    assert!(matches!(err, Error::RecordNotFound(id) if id == "mq-missing"));
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}
