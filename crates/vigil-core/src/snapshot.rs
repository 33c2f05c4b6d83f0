//! Crash-safe persistence of the timeout ledgers.
//!
//! One pretty-printed JSON file per category (human-diffable, keyed by
//! task id) under a configurable base directory. Saves are full-replace:
//! write to a temp file in the same directory, then rename over the
//! target, so a crash mid-write cannot corrupt the previous snapshot.
//! A missing file on load is a valid initial state, not an error.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::app::classifier::TimeoutLedger;
use crate::domain::{Task, TaskCategory};
use crate::error::SnapshotError;

const UNCLAIMED_FILE: &str = "timeout_tasks.json";
const UNFINISHED_FILE: &str = "timeout_finish_tasks.json";

fn file_name(category: TaskCategory) -> &'static str {
    match category {
        TaskCategory::Unclaimed => UNCLAIMED_FILE,
        TaskCategory::Unfinished => UNFINISHED_FILE,
    }
}

/// Writes and restores per-category ledger snapshots.
#[derive(Debug, Clone)]
pub struct Snapshotter {
    base_dir: PathBuf,
}

impl Snapshotter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn path_for(&self, category: TaskCategory) -> PathBuf {
        self.base_dir.join(file_name(category))
    }

    /// Serialize one category's ledger, full-replace.
    pub fn save(&self, category: TaskCategory, ledger: &TimeoutLedger) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.base_dir)?;

        let target = self.path_for(category);
        let tmp = target.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(ledger.as_map())?;

        fs::write(&tmp, data)?;
        fs::rename(&tmp, &target)?;

        debug!(path = %target.display(), entries = ledger.len(), "snapshot saved");
        Ok(())
    }

    /// Restore one category's ledger. Missing file ⇒ empty ledger.
    pub fn load(&self, category: TaskCategory) -> Result<TimeoutLedger, SnapshotError> {
        let path = self.path_for(category);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no snapshot, starting empty");
                return Ok(TimeoutLedger::new());
            }
            Err(e) => return Err(e.into()),
        };

        let tasks: HashMap<String, Task> = serde_json::from_slice(&data)?;
        info!(path = %path.display(), entries = tasks.len(), "snapshot loaded");
        Ok(TimeoutLedger::from_tasks(tasks))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
