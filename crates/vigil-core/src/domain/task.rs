//! Task model: what the monitor observes, never what it owns.
//!
//! Tasks are re-read from the source every tick; the source stays the
//! system of record. The engine only accumulates derived state (timeout
//! ledgers, cooldown records) keyed by task id.

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a task is late.
///
/// - `Unclaimed`: created but never assigned to a reviewer.
/// - `Unfinished`: assigned but not completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Unclaimed,
    Unfinished,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Unclaimed => "unclaimed",
            TaskCategory::Unfinished => "unfinished",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One open workflow task as reported by the source.
///
/// Identity is `id` (globally unique within the monitored window).
/// Immutable once read for a given tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub created_at: DateTime<Local>,
    pub category: TaskCategory,
}

impl Task {
    pub fn new(id: impl Into<String>, created_at: DateTime<Local>, category: TaskCategory) -> Self {
        Self {
            id: id.into(),
            created_at,
            category,
        }
    }

    /// Age of the task at `now`.
    pub fn age(&self, now: DateTime<Local>) -> Duration {
        now.signed_duration_since(self.created_at)
    }
}

/// Per-category timeout thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub unclaimed: Duration,
    pub unfinished: Duration,
}

impl Thresholds {
    pub fn from_minutes(unclaimed: i64, unfinished: i64) -> Self {
        Self {
            unclaimed: Duration::minutes(unclaimed),
            unfinished: Duration::minutes(unfinished),
        }
    }

    pub fn for_category(&self, category: TaskCategory) -> Duration {
        match category {
            TaskCategory::Unclaimed => self.unclaimed,
            TaskCategory::Unfinished => self.unfinished,
        }
    }
}

impl Default for Thresholds {
    /// Defaults match the production configuration: 3 minutes to claim,
    /// 10 minutes to finish.
    fn default() -> Self {
        Self::from_minutes(3, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn category_round_trips_through_serde() {
        let json = serde_json::to_string(&TaskCategory::Unclaimed).unwrap();
        assert_eq!(json, "\"unclaimed\"");
        let back: TaskCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TaskCategory::Unclaimed);
    }

    #[test]
    fn age_is_signed() {
        let created = Local.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let task = Task::new("t-1", created, TaskCategory::Unclaimed);

        let later = created + Duration::minutes(4);
        assert_eq!(task.age(later), Duration::minutes(4));

        // A task "from the future" has negative age and can never time out.
        let earlier = created - Duration::minutes(1);
        assert!(task.age(earlier) < Duration::zero());
    }

    #[test]
    fn thresholds_select_by_category() {
        let t = Thresholds::from_minutes(3, 10);
        assert_eq!(t.for_category(TaskCategory::Unclaimed), Duration::minutes(3));
        assert_eq!(t.for_category(TaskCategory::Unfinished), Duration::minutes(10));
    }
}
