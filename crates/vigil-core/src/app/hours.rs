//! Working-hours gate.
//!
//! Alerts only go out between `start_hour` (inclusive) and `end_hour`
//! (exclusive), local wall-clock. Outside the window timed-out tasks are
//! still recorded into the ledgers — nothing is lost — but no message is
//! sent and no cooldown entry is written, so the first in-window tick
//! after a quiet night alerts immediately.

use chrono::{DateTime, Local, Timelike};

pub fn in_window(now: DateTime<Local>, start_hour: u32, end_hour: u32) -> bool {
    let hour = now.hour();
    hour >= start_hour && hour < end_hour
}
