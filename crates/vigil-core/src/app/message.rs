//! Alert and summary message bodies.
//!
//! Bodies use the chat-ops endpoint's markdown dialect: `<font
//! color="...">` spans, red for figures, blue for task ids. The notifier
//! passes them through untouched.

use chrono::{DateTime, Duration, Local};

use crate::domain::{Task, TaskCategory};

fn red(n: usize) -> String {
    format!("<font color=\"red\">{n}</font>")
}

fn id_list(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|t| format!("<font color=\"blue\">{}</font>", t.id))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Body for a timeout alert.
///
/// - `alerted`: tasks passing the cooldown gate this tick (listed by id)
/// - `current_total`: all tasks over threshold this tick
/// - `cumulative_total`: ledger size since the daily reset
pub fn timeout_alert(
    category: TaskCategory,
    alerted: &[Task],
    current_total: usize,
    cumulative_total: usize,
) -> String {
    let (title, verb) = match category {
        TaskCategory::Unclaimed => ("unclaimed past timeout", "unclaimed"),
        TaskCategory::Unfinished => ("claimed but overdue", "overdue"),
    };
    format!(
        "[Timeout alert] {title}\n\
         {} new review task(s) are {verb}; {} currently {verb} in total, \
         {} accumulated today. Please handle them promptly.\n\
         Task list:\n{}",
        red(alerted.len()),
        red(current_total),
        red(cumulative_total),
        id_list(alerted),
    )
}

/// Body for the once-per-day summary of unfinished timeouts.
pub fn daily_summary(now: DateTime<Local>, count: usize) -> String {
    let yesterday = (now - Duration::hours(24)).format("%Y-%m-%d");
    format!(
        "[Daily summary]\nYesterday ({yesterday}) {} review task(s) ran past \
         the completion timeout.",
        red(count),
    )
}
