//! Error types for the engine's ports.
//!
//! Each port gets its own small enum so callers can tell which collaborator
//! failed. None of these are fatal to the engine: a source failure skips
//! one tick, a notify failure drops one message, a snapshot failure keeps
//! the in-memory state authoritative.

use thiserror::Error;

/// Task source failures (query error, unreachable backend).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("task query failed: {0}")]
    Query(String),

    #[error("task source unreachable: {0}")]
    Unreachable(String),
}

/// Notification delivery failures.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("endpoint returned status {0}")]
    Status(u16),
}

/// Snapshot read/write failures.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot decode: {0}")]
    Decode(#[from] serde_json::Error),
}
