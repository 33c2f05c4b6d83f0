//! Notifier port - chat-ops webhook delivery.
//!
//! The engine decides *whether* and *with what content* to notify; the
//! implementation owns URLs, payload envelopes, and HTTP. Message bodies
//! carry simple rich-text markup (`<font color="...">` spans) that the
//! endpoint passes through.

use async_trait::async_trait;
use std::fmt;

use crate::error::NotifyError;

/// Which destination an alert goes to.
///
/// The production setup routes each kind to its own webhook group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    UnclaimedTimeout,
    UnfinishedTimeout,
    DailySummary,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertKind::UnclaimedTimeout => "unclaimed_timeout",
            AlertKind::UnfinishedTimeout => "unfinished_timeout",
            AlertKind::DailySummary => "daily_summary",
        };
        f.write_str(s)
    }
}

/// Delivers one formatted message to one destination.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, kind: AlertKind, message: &str) -> Result<(), NotifyError>;
}
