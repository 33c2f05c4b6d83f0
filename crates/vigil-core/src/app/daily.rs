//! Daily cycle controller: one summary, one reset, per calendar day.
//!
//! Two states per day: PENDING → DONE. The DONE → PENDING transition is
//! implicit on day-of-year change; the PENDING → DONE transition fires at
//! most once inside the configured morning window, guarded by `done_today`
//! so repeated ticks inside the window stay idempotent. The controller
//! does not assume the tick interval divides a day evenly.

use chrono::{DateTime, Datelike, Duration, Local, Timelike};

use crate::app::classifier::TimeoutLedger;

/// Local-time window in which the summary may fire, e.g. 09:00–09:05.
#[derive(Debug, Clone, Copy)]
pub struct SummaryWindow {
    pub hour: u32,
    pub minutes: u32,
}

impl Default for SummaryWindow {
    fn default() -> Self {
        Self { hour: 9, minutes: 5 }
    }
}

/// Day-boundary state machine.
#[derive(Debug)]
pub struct DailyCycle {
    last_summary_day: u32,
    done_today: bool,
}

impl Default for DailyCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl DailyCycle {
    pub fn new() -> Self {
        // Day 0 never matches a real ordinal, so the first observed tick
        // rolls over into PENDING for its own day.
        Self {
            last_summary_day: 0,
            done_today: false,
        }
    }

    /// Reset to PENDING whenever the observed day-of-year changes.
    pub fn roll_over(&mut self, now: DateTime<Local>) {
        let day = now.ordinal();
        if self.last_summary_day != day {
            self.last_summary_day = day;
            self.done_today = false;
        }
    }

    /// True when the summary should fire this tick. Call `roll_over` first.
    pub fn should_fire(&self, now: DateTime<Local>, window: SummaryWindow) -> bool {
        !self.done_today && now.hour() == window.hour && now.minute() < window.minutes
    }

    pub fn mark_done(&mut self) {
        self.done_today = true;
    }

    pub fn done_today(&self) -> bool {
        self.done_today
    }
}

/// Count ledger entries created within the prior 24 hours whose
/// hour-of-day falls strictly inside (8, 21) — i.e. during the working
/// day. This is the figure the daily summary reports for the unfinished
/// category.
pub fn count_recent_working_hours(ledger: &TimeoutLedger, now: DateTime<Local>) -> usize {
    let floor = now - Duration::hours(24);
    ledger
        .tasks()
        .filter(|t| t.created_at > floor && t.created_at < now)
        .filter(|t| {
            let hour = t.created_at.hour();
            hour > 8 && hour < 21
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Task, TaskCategory};
    use chrono::TimeZone;

    fn day_at(day: u32, h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, day, h, m, 0).unwrap()
    }

    #[test]
    fn fires_once_inside_window() {
        let mut cycle = DailyCycle::new();
        let window = SummaryWindow::default();

        let now = day_at(10, 9, 2);
        cycle.roll_over(now);
        assert!(cycle.should_fire(now, window));
        cycle.mark_done();

        // Repeated ticks in the same window stay quiet.
        for minute in [3, 4] {
            let later = day_at(10, 9, minute);
            cycle.roll_over(later);
            assert!(!cycle.should_fire(later, window));
        }
    }

    #[test]
    fn outside_window_never_fires() {
        let mut cycle = DailyCycle::new();
        let window = SummaryWindow::default();

        for (h, m) in [(8, 59), (9, 5), (9, 30), (10, 0), (21, 0)] {
            let now = day_at(10, h, m);
            cycle.roll_over(now);
            assert!(!cycle.should_fire(now, window), "fired at {h:02}:{m:02}");
        }
    }

    #[test]
    fn day_rollover_restores_pending() {
        let mut cycle = DailyCycle::new();
        let window = SummaryWindow::default();

        let today = day_at(10, 9, 1);
        cycle.roll_over(today);
        assert!(cycle.should_fire(today, window));
        cycle.mark_done();
        assert!(cycle.done_today());

        let tomorrow = day_at(11, 9, 1);
        cycle.roll_over(tomorrow);
        assert!(!cycle.done_today());
        assert!(cycle.should_fire(tomorrow, window));
    }

    #[test]
    fn summary_count_filters_by_recency_and_hour() {
        let now = day_at(10, 9, 2);
        let mut ledger = TimeoutLedger::new();
        let mut add = |id: &str, created_at: DateTime<Local>| {
            ledger.record(&Task::new(id, created_at, TaskCategory::Unfinished));
        };

        add("in-1", day_at(9, 14, 0)); // yesterday afternoon: counted
        add("in-2", day_at(9, 20, 30)); // 20:xx is still < 21: counted
        add("at-9", day_at(10, 9, 0)); // this morning, within 24h: counted
        add("early", day_at(9, 8, 30)); // hour 8 excluded (strict >8)
        add("late", day_at(9, 21, 5)); // hour 21 excluded (strict <21)
        add("stale", day_at(8, 14, 0)); // older than 24h

        assert_eq!(count_recent_working_hours(&ledger, now), 3);
    }
}
