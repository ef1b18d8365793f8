// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outbox-core: Shared domain types for the outbox offline mutation queue.
//!
//! This crate is free of I/O. It provides the connectivity state machine
//! values, queued mutation records, the WebSocket heartbeat protocol, and
//! the failure classifier used by both the queue and the sync engine.

pub mod classify;
pub mod error;
pub mod protocol;
pub mod record;
pub mod state;

pub use classify::{classify, probe_state, CallOutcome, FailureKind};
pub use error::{Error, Result};
pub use protocol::SocketMessage;
pub use record::{generate_record_id, generate_unique_record_id, Method, Mutation, QueueRecord};
pub use state::ConnectivityState;
