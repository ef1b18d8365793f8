// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL-backed queue store.
//!
//! Each record is written as a single line and fsynced immediately. Removals
//! and attempt updates rewrite the whole file to a temporary sibling and
//! rename it into place, so a reader sees either the old or the new
//! contents and never a partial write.
//!
//! A sidecar `.lock` file serializes access between processes (for example
//! `outbox enqueue` running while `outbox watch` drains).

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;
use outbox_core::{generate_unique_record_id, Mutation, QueueRecord};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{QueueError, QueueResult, QueueStore, StoreFuture};

/// Durable queue store persisted as JSON lines.
pub struct JsonlQueueStore {
    /// Path to the queue file.
    path: PathBuf,
    /// Path to the inter-process lock file.
    lock_path: PathBuf,
    /// Serializes operations within this process.
    guard: Mutex<()>,
}

impl JsonlQueueStore {
    /// Create or open a queue at the given path.
    ///
    /// Missing parent directories are created.
    pub fn open(path: &Path) -> QueueResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Ensure the file exists (create if not)
        OpenOptions::new().create(true).append(true).open(path)?;

        Ok(JsonlQueueStore {
            path: path.to_path_buf(),
            lock_path: sibling(path, "lock"),
            guard: Mutex::new(()),
        })
    }

    /// Path to the queue file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` on a blocking thread while holding both locks.
    async fn with_locked_file<T, F>(&self, op: F) -> QueueResult<T>
    where
        F: FnOnce(&Path) -> QueueResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let _guard = self.guard.lock().await;
        let path = self.path.clone();
        let lock_path = self.lock_path.clone();

        tokio::task::spawn_blocking(move || {
            let _lock = lock_file(&lock_path)?;
            op(&path)
        })
        .await
        .map_err(|e| QueueError::Unavailable(format!("queue task failed: {}", e)))?
    }
}

impl QueueStore for JsonlQueueStore {
    fn enqueue(&self, payload: Mutation) -> StoreFuture<'_, QueueRecord> {
        Box::pin(self.with_locked_file(move |path| {
            let contents = read_records(path)?;
            if contents.torn_tail || contents.unterminated {
                // Start the append on a fresh line
                rewrite_records(path, &contents.records)?;
            }

            let created_at = Utc::now();
            let id = generate_unique_record_id(&payload, &created_at, |candidate| {
                contents.records.iter().any(|r| r.id == candidate)
            });
            let record = QueueRecord::new(id, payload, created_at);
            append_record(path, &record)?;

            debug!(id = %record.id, "enqueued mutation");
            Ok(record)
        }))
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<QueueRecord>> {
        Box::pin(self.with_locked_file(|path| Ok(read_records(path)?.records)))
    }

    fn remove<'a>(&'a self, id: &'a str) -> StoreFuture<'a, ()> {
        let id = id.to_owned();
        Box::pin(self.with_locked_file(move |path| {
            let mut records = read_records(path)?.records;
            let before = records.len();
            records.retain(|r| r.id != id);

            if records.len() == before {
                debug!(%id, "remove: record already absent");
                return Ok(());
            }
            rewrite_records(path, &records)
        }))
    }

    fn update_attempts<'a>(&'a self, id: &'a str, attempts: u32) -> StoreFuture<'a, ()> {
        let id = id.to_owned();
        Box::pin(self.with_locked_file(move |path| {
            let mut records = read_records(path)?.records;
            match records.iter_mut().find(|r| r.id == id) {
                Some(record) => record.attempts = attempts,
                None => {
                    debug!(%id, "update_attempts: record absent");
                    return Ok(());
                }
            }
            rewrite_records(path, &records)
        }))
    }
}

/// Decoded file contents.
struct Contents {
    records: Vec<QueueRecord>,
    /// The final line was cut short by an interrupted append.
    torn_tail: bool,
    /// The file does not end with a newline, even if the last record parsed.
    unterminated: bool,
}

fn read_records(path: &Path) -> QueueResult<Contents> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Contents {
                records: Vec::new(),
                torn_tail: false,
                unterminated: false,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let unterminated = !text.is_empty() && !text.ends_with('\n');
    let lines: Vec<&str> = text.lines().collect();
    let last_index = lines.len().saturating_sub(1);

    let mut records = Vec::with_capacity(lines.len());
    let mut torn_tail = false;

    for (index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<QueueRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) if unterminated && index == last_index => {
                warn!(path = %path.display(), "ignoring incomplete trailing record: {}", e);
                torn_tail = true;
            }
            Err(e) => {
                return Err(QueueError::Corrupted {
                    line: index + 1,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(Contents {
        records,
        torn_tail,
        unterminated,
    })
}

fn append_record(path: &Path, record: &QueueRecord) -> QueueResult<()> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn rewrite_records(path: &Path, records: &[QueueRecord]) -> QueueResult<()> {
    let tmp_path = sibling(path, "tmp");
    {
        let mut file = File::create(&tmp_path)?;
        for record in records {
            let json = serde_json::to_string(record)?;
            writeln!(file, "{}", json)?;
        }
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn lock_file(lock_path: &Path) -> QueueResult<File> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;
    file.lock_exclusive()?;
    Ok(file)
}

/// `queue.jsonl` -> `queue.jsonl.<ext>`
fn sibling(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
