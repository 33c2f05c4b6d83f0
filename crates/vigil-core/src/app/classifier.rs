//! Timeout classification and the cumulative timeout ledgers.
//!
//! Design:
//! - The ledger is a historical tally of timeout *events* since the last
//!   daily reset, not a live gauge. A task that later gets claimed or
//!   finished stays in the ledger until the reset clears it.
//! - Insertion is idempotent keyed by id: re-observing a recorded task
//!   does not count as "newly timed out" and does not refresh anything;
//!   the first-seen value wins.

use chrono::{DateTime, Local};
use std::collections::HashMap;

use crate::domain::{Task, TaskCategory, Thresholds};

/// Every task observed as timed-out since the last daily reset, keyed by id.
#[derive(Debug, Default)]
pub struct TimeoutLedger {
    tasks: HashMap<String, Task>,
}

impl TimeoutLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: HashMap<String, Task>) -> Self {
        Self { tasks }
    }

    /// Insert if absent. Returns true when the task was not yet recorded.
    pub fn record(&mut self, task: &Task) -> bool {
        if self.tasks.contains_key(&task.id) {
            return false;
        }
        self.tasks.insert(task.id.clone(), task.clone());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Snapshot view for persistence.
    pub fn as_map(&self) -> &HashMap<String, Task> {
        &self.tasks
    }
}

/// What one tick's classification produced for a single category.
#[derive(Debug, Default)]
pub struct Classification {
    /// All tasks over threshold this tick, sorted by id.
    pub timed_out: Vec<Task>,
    /// The subset of `timed_out` that entered the ledger this tick.
    pub newly_recorded: Vec<Task>,
    /// Ledger size after recording (cumulative count for the day).
    pub cumulative: usize,
}

/// Both categories' ledgers plus the classification step.
#[derive(Debug, Default)]
pub struct TimeoutClassifier {
    unclaimed: TimeoutLedger,
    unfinished: TimeoutLedger,
}

impl TimeoutClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self, category: TaskCategory) -> &TimeoutLedger {
        match category {
            TaskCategory::Unclaimed => &self.unclaimed,
            TaskCategory::Unfinished => &self.unfinished,
        }
    }

    /// Replace one category's ledger wholesale (snapshot restore).
    pub fn restore(&mut self, category: TaskCategory, ledger: TimeoutLedger) {
        match category {
            TaskCategory::Unclaimed => self.unclaimed = ledger,
            TaskCategory::Unfinished => self.unfinished = ledger,
        }
    }

    /// Daily reset: both categories at once.
    pub fn clear_all(&mut self) {
        self.unclaimed.clear();
        self.unfinished.clear();
    }

    /// Partition `tasks` into still-fresh vs timed-out and record the
    /// timed-out ones into their category's ledger.
    ///
    /// Timed-out ⟺ `now - created_at > threshold(category)`; exactly-equal
    /// age is NOT timed out. Outputs are sorted by id so tests are
    /// reproducible regardless of input order.
    pub fn classify(
        &mut self,
        tasks: &[Task],
        now: DateTime<Local>,
        thresholds: &Thresholds,
    ) -> (Classification, Classification) {
        let mut unclaimed = Classification::default();
        let mut unfinished = Classification::default();

        for task in tasks {
            if task.age(now) <= thresholds.for_category(task.category) {
                continue;
            }
            let (ledger, out) = match task.category {
                TaskCategory::Unclaimed => (&mut self.unclaimed, &mut unclaimed),
                TaskCategory::Unfinished => (&mut self.unfinished, &mut unfinished),
            };
            if ledger.record(task) {
                out.newly_recorded.push(task.clone());
            }
            out.timed_out.push(task.clone());
        }

        for out in [&mut unclaimed, &mut unfinished] {
            out.timed_out.sort_by(|a, b| a.id.cmp(&b.id));
            out.newly_recorded.sort_by(|a, b| a.id.cmp(&b.id));
        }
        unclaimed.cumulative = self.unclaimed.len();
        unfinished.cumulative = self.unfinished.len();

        (unclaimed, unfinished)
    }
}
