//! In-memory task source.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::Task;
use crate::error::SourceError;
use crate::ports::TaskSource;

/// A task source backed by a shared `Vec<Task>`.
///
/// Clones share state, so a test can hand one clone to the engine and use
/// another to change what the next fetch returns or to simulate an outage.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskSource {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    tasks: Vec<Task>,
    unavailable: bool,
}

impl MemoryTaskSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the open-task set returned by subsequent fetches.
    pub fn set_tasks(&self, tasks: Vec<Task>) {
        self.inner.lock().unwrap().tasks = tasks;
    }

    /// Make fetch/ping fail until turned back off.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unwrap().unavailable = unavailable;
    }
}

#[async_trait]
impl TaskSource for MemoryTaskSource {
    async fn fetch(&self) -> Result<Vec<Task>, SourceError> {
        let inner = self.inner.lock().unwrap();
        if inner.unavailable {
            return Err(SourceError::Unreachable("simulated outage".into()));
        }
        Ok(inner.tasks.clone())
    }

    async fn ping(&self) -> Result<(), SourceError> {
        if self.inner.lock().unwrap().unavailable {
            return Err(SourceError::Unreachable("simulated outage".into()));
        }
        Ok(())
    }
}
