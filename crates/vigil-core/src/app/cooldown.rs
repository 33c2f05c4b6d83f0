//! Alert cooldown tracking: one tracker per category.
//!
//! `record_alert` is the only mutator and must be called exactly once per
//! task actually alerted — never for tasks the gate or `should_alert`
//! filtered out. Entries older than the retention window are pruned at
//! write time so the map cannot grow without bound.

use chrono::{DateTime, Duration, Local};
use std::collections::HashMap;

/// How long a stale cooldown entry may linger before write-time pruning
/// removes it. Correctness never depends on pruning; this only bounds
/// memory.
fn retention() -> Duration {
    Duration::hours(1)
}

/// Last-alert times keyed by task id, for a single alert category.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_alert: HashMap<String, DateTime<Local>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff no prior alert was recorded for `id`, or the last one is
    /// older than `cooldown` (strictly).
    pub fn should_alert(&self, id: &str, now: DateTime<Local>, cooldown: Duration) -> bool {
        match self.last_alert.get(id) {
            None => true,
            Some(last) => now.signed_duration_since(*last) > cooldown,
        }
    }

    /// Record that an alert for `id` was dispatched at `now`, pruning
    /// entries past the retention window.
    pub fn record_alert(&mut self, id: &str, now: DateTime<Local>) {
        self.last_alert
            .retain(|_, last| now.signed_duration_since(*last) <= retention());
        self.last_alert.insert(id.to_string(), now);
    }

    pub fn len(&self) -> usize {
        self.last_alert.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_alert.is_empty()
    }
}
