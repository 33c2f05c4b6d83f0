//! Notifier that records instead of delivering.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::NotifyError;
use crate::ports::{AlertKind, Notifier};

/// Captures every message the engine tries to send.
///
/// Clones share the captured list. `set_failing` makes `send` return an
/// error while still recording the attempt, which is how tests observe
/// the optimistic-cooldown behavior.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    sent: Vec<(AlertKind, String)>,
    failing: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }

    /// All (kind, body) pairs attempted so far, in order.
    pub fn sent(&self) -> Vec<(AlertKind, String)> {
        self.inner.lock().unwrap().sent.clone()
    }

    /// Attempts for one kind only.
    pub fn sent_of(&self, kind: AlertKind) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .sent
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, body)| body.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, kind: AlertKind, message: &str) -> Result<(), NotifyError> {
        let mut inner = self.inner.lock().unwrap();
        inner.sent.push((kind, message.to_string()));
        if inner.failing {
            return Err(NotifyError::Delivery("simulated delivery failure".into()));
        }
        Ok(())
    }
}
