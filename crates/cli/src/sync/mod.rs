// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay of queued mutations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  Online  ┌─────────────┐  replay   ┌─────────────┐
//! │ Connectivity │─────────►│ SyncEngine  │──────────►│  Replayer   │──► backend
//! │   Monitor    │          │ (one drain  │◄──────────│   (trait)   │
//! └──────────────┘          │  at a time) │  outcome  └─────────────┘
//!                           └─────────────┘
//!                                  │ list / remove / update_attempts
//!                                  ▼
//!                           ┌─────────────┐
//!                           │ QueueStore  │
//!                           └─────────────┘
//! ```
//!
//! # Features
//!
//! - Insertion-order replay, removing each record once applied
//! - A pass stops at the first connectivity failure and resumes on the next
//! - Rejected records are kept with a bumped attempt counter
//! - Single-flight drains: concurrent callers share the in-flight pass
//! - Operator discard policy by attempts or age
//! - Injectable replayer trait for testing

mod engine;
mod replay;

pub use engine::{
    DiscardPolicy, DrainReport, DrainStatus, Submission, SyncEngine, SyncError, SyncResult,
};
pub use replay::{HttpReplayer, ReplayError, Replayer};

#[cfg(test)]
mod test_helpers;
