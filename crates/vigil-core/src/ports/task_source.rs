//! TaskSource port - the workflow-task table behind a narrow interface.
//!
//! The trailing query window and process/task-definition filters are
//! implementation details of the backing store; the engine only sees
//! well-formed `Task` values.

use async_trait::async_trait;

use crate::domain::Task;
use crate::error::SourceError;

/// Supplies the current set of open tasks.
///
/// The source is the system of record: the engine re-fetches every tick
/// and never writes back. Malformed rows are the implementation's problem
/// (skip and log); a returned `Err` means the whole tick's classification
/// is skipped.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Fetch all open tasks in the monitored window.
    async fn fetch(&self) -> Result<Vec<Task>, SourceError>;

    /// Cheap reachability probe, used by the readiness endpoint.
    async fn ping(&self) -> Result<(), SourceError>;
}
