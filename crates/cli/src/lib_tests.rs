// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use clap::Parser;
use tempfile::TempDir;

use super::*;

fn config_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("outbox.toml");
    let queue = dir.path().join("queue.jsonl");
    std::fs::write(&path, format!("queue_path = {:?}\n", queue.display().to_string())).unwrap();
    path
}

#[test]
fn run_enqueue_then_list_and_discard() {
    let dir = TempDir::new().unwrap();
    let config = config_file(&dir);
    let config_arg = config.to_str().unwrap();

    run(Cli::parse_from(["outbox", "--config", config_arg, "enqueue", "POST", "/items"])).unwrap();
    run(Cli::parse_from(["outbox", "--config", config_arg, "list"])).unwrap();

    let loaded = Config::load(&config).unwrap();
    let store = JsonlQueueStore::open(&loaded.queue_path()).unwrap();
    let records = tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(store.list_all())
        .unwrap();
    assert_eq!(records.len(), 1);

    run(Cli::parse_from(["outbox", "--config", config_arg, "discard", records[0].id.as_str()])).unwrap();
    let records = tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(store.list_all())
        .unwrap();
    assert!(records.is_empty());
}

#[test]
fn run_with_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");

    let err = run(Cli::parse_from([
        "outbox",
        "--config",
        missing.to_str().unwrap(),
        "list",
    ]))
    .unwrap_err();

    assert!(matches!(err, Error::ConfigNotFound(_)));
}
