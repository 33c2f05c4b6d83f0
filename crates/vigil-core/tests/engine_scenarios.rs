//! End-to-end engine scenarios: fixed clock, in-memory source, recording
//! notifier, temp-dir snapshots.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone};
use tempfile::TempDir;

use vigil_core::app::engine::{Engine, EngineConfig};
use vigil_core::domain::{Task, TaskCategory};
use vigil_core::impls::{MemoryTaskSource, RecordingNotifier};
use vigil_core::ports::{AlertKind, FixedClock};
use vigil_core::snapshot::Snapshotter;

struct Harness {
    clock: FixedClock,
    source: MemoryTaskSource,
    notifier: RecordingNotifier,
    engine: Engine<FixedClock>,
    dir: TempDir,
}

fn at(day: u32, h: u32, m: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 3, day, h, m, 0).unwrap()
}

fn harness_at(now: DateTime<Local>) -> Harness {
    let clock = FixedClock::new(now);
    let source = MemoryTaskSource::new();
    let notifier = RecordingNotifier::new();
    let dir = TempDir::new().unwrap();
    let engine = Engine::new(
        clock.clone(),
        EngineConfig::default(),
        Arc::new(source.clone()),
        Arc::new(notifier.clone()),
        Snapshotter::new(dir.path()),
    );
    Harness {
        clock,
        source,
        notifier,
        engine,
        dir,
    }
}

fn unclaimed(id: &str, created_at: DateTime<Local>) -> Task {
    Task::new(id, created_at, TaskCategory::Unclaimed)
}

fn unfinished(id: &str, created_at: DateTime<Local>) -> Task {
    Task::new(id, created_at, TaskCategory::Unfinished)
}

#[tokio::test]
async fn overdue_unclaimed_task_alerts_once() {
    // Threshold 3 min, task 4 min old, 10:00 on a working day.
    let now = at(10, 10, 0);
    let h = harness_at(now);
    h.source
        .set_tasks(vec![unclaimed("t-1", now - Duration::minutes(4))]);

    let report = h.engine.tick().await;
    assert!(report.source_ok);
    assert_eq!(report.timed_out_unclaimed, 1);
    assert_eq!(report.alerted_unclaimed, 1);

    let sent = h.notifier.sent_of(AlertKind::UnclaimedTimeout);
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("t-1"));

    assert_eq!(h.engine.cumulative(TaskCategory::Unclaimed).await, 1);
    assert_eq!(h.engine.cooldown_entries(TaskCategory::Unclaimed).await, 1);
}

#[tokio::test]
async fn recheck_inside_cooldown_stays_silent() {
    let now = at(10, 10, 0);
    let h = harness_at(now);
    h.source
        .set_tasks(vec![unclaimed("t-1", now - Duration::minutes(4))]);

    h.engine.tick().await;
    h.clock.advance(Duration::minutes(2));
    let report = h.engine.tick().await;

    // Still timed out, but the 10-minute cooldown suppresses a repeat.
    assert_eq!(report.timed_out_unclaimed, 1);
    assert_eq!(report.alerted_unclaimed, 0);
    assert_eq!(h.notifier.sent_of(AlertKind::UnclaimedTimeout).len(), 1);

    // Past the cooldown the same task alerts again.
    h.clock.advance(Duration::minutes(9));
    let report = h.engine.tick().await;
    assert_eq!(report.alerted_unclaimed, 1);
    assert_eq!(h.notifier.sent_of(AlertKind::UnclaimedTimeout).len(), 2);
}

#[tokio::test]
async fn fresh_task_is_not_reported() {
    let now = at(10, 10, 0);
    let h = harness_at(now);
    h.source
        .set_tasks(vec![unclaimed("young", now - Duration::minutes(2))]);

    let report = h.engine.tick().await;
    assert_eq!(report.timed_out_unclaimed, 0);
    assert!(h.notifier.sent().is_empty());
    assert_eq!(h.engine.cumulative(TaskCategory::Unclaimed).await, 0);
}

#[tokio::test]
async fn off_hours_records_but_does_not_alert() {
    let night = at(10, 22, 0);
    let h = harness_at(night);
    h.source
        .set_tasks(vec![unclaimed("t-1", night - Duration::minutes(30))]);

    let report = h.engine.tick().await;
    assert_eq!(report.timed_out_unclaimed, 1);
    assert_eq!(report.alerted_unclaimed, 0);
    assert!(h.notifier.sent().is_empty());
    assert_eq!(h.engine.cumulative(TaskCategory::Unclaimed).await, 1);
    // No cooldown entry was written off-hours...
    assert_eq!(h.engine.cooldown_entries(TaskCategory::Unclaimed).await, 0);

    // ...so the first in-window tick alerts immediately.
    h.clock.set(at(11, 10, 0));
    let report = h.engine.tick().await;
    assert_eq!(report.alerted_unclaimed, 1);
    assert_eq!(h.notifier.sent_of(AlertKind::UnclaimedTimeout).len(), 1);
}

#[tokio::test]
async fn daily_summary_fires_once_and_resets_both_ledgers() {
    // Record three unfinished timeouts the afternoon before (ticking at
    // 22:00 keeps the notifier quiet while filling the ledger).
    let evening = at(9, 22, 0);
    let h = harness_at(evening);
    h.source.set_tasks(vec![
        unfinished("f-1", at(9, 14, 0)),
        unfinished("f-2", at(9, 15, 30)),
        unfinished("f-3", at(9, 16, 45)),
        unclaimed("u-1", at(9, 14, 0)),
    ]);
    h.engine.tick().await;
    assert_eq!(h.engine.cumulative(TaskCategory::Unfinished).await, 3);
    assert_eq!(h.engine.cumulative(TaskCategory::Unclaimed).await, 1);

    // 09:02 next day: summary reports 3 and clears both categories.
    h.source.set_tasks(vec![]);
    h.clock.set(at(10, 9, 2));
    let report = h.engine.tick().await;
    assert!(report.summary_fired);

    let summaries = h.notifier.sent_of(AlertKind::DailySummary);
    assert_eq!(summaries.len(), 1);
    assert!(summaries[0].contains("<font color=\"red\">3</font>"));
    assert_eq!(h.engine.cumulative(TaskCategory::Unfinished).await, 0);
    assert_eq!(h.engine.cumulative(TaskCategory::Unclaimed).await, 0);

    // Another tick in the same window is a no-op.
    h.clock.set(at(10, 9, 4));
    let report = h.engine.tick().await;
    assert!(!report.summary_fired);
    assert_eq!(h.notifier.sent_of(AlertKind::DailySummary).len(), 1);
}

#[tokio::test]
async fn summary_pending_again_after_day_rollover() {
    let h = harness_at(at(10, 9, 1));
    let report = h.engine.tick().await;
    assert!(report.summary_fired);

    h.clock.set(at(11, 9, 1));
    let report = h.engine.tick().await;
    assert!(report.summary_fired);
    assert_eq!(h.notifier.sent_of(AlertKind::DailySummary).len(), 2);
}

#[tokio::test]
async fn source_outage_skips_classification_and_keeps_state() {
    let now = at(10, 10, 0);
    let h = harness_at(now);
    h.source
        .set_tasks(vec![unclaimed("t-1", now - Duration::minutes(4))]);
    h.engine.tick().await;
    assert_eq!(h.engine.cumulative(TaskCategory::Unclaimed).await, 1);

    h.source.set_unavailable(true);
    h.clock.advance(Duration::minutes(1));
    let report = h.engine.tick().await;
    assert!(!report.source_ok);
    assert_eq!(report.fetched, 0);
    assert_eq!(h.engine.cumulative(TaskCategory::Unclaimed).await, 1);
    assert_eq!(h.notifier.sent_of(AlertKind::UnclaimedTimeout).len(), 1);
}

#[tokio::test]
async fn failed_delivery_still_suppresses_retry_within_cooldown() {
    let now = at(10, 10, 0);
    let h = harness_at(now);
    h.source
        .set_tasks(vec![unclaimed("t-1", now - Duration::minutes(4))]);
    h.notifier.set_failing(true);

    h.engine.tick().await;
    // The attempt was made and the cooldown was recorded optimistically.
    assert_eq!(h.notifier.sent_of(AlertKind::UnclaimedTimeout).len(), 1);
    assert_eq!(h.engine.cooldown_entries(TaskCategory::Unclaimed).await, 1);

    h.notifier.set_failing(false);
    h.clock.advance(Duration::minutes(2));
    h.engine.tick().await;
    assert_eq!(h.notifier.sent_of(AlertKind::UnclaimedTimeout).len(), 1);
}

#[tokio::test]
async fn snapshot_round_trip_survives_restart() {
    let now = at(10, 22, 0);
    let h = harness_at(now);
    h.source.set_tasks(vec![
        unclaimed("u-1", now - Duration::minutes(30)),
        unfinished("f-1", now - Duration::minutes(40)),
    ]);
    h.engine.tick().await;
    h.engine.save_now().await.unwrap();

    // Fresh engine, same snapshot directory: counts come back.
    let clock = FixedClock::new(now + Duration::minutes(5));
    let restarted = Engine::new(
        clock,
        EngineConfig::default(),
        Arc::new(MemoryTaskSource::new()),
        Arc::new(RecordingNotifier::new()),
        Snapshotter::new(h.dir.path()),
    );
    restarted.restore().await;
    assert_eq!(restarted.cumulative(TaskCategory::Unclaimed).await, 1);
    assert_eq!(restarted.cumulative(TaskCategory::Unfinished).await, 1);
}

#[tokio::test]
async fn interval_save_triggers_after_save_interval() {
    let now = at(10, 10, 0);
    let h = harness_at(now);

    let report = h.engine.tick().await;
    assert!(!report.saved);

    h.clock.advance(Duration::minutes(11));
    let report = h.engine.tick().await;
    assert!(report.saved);
    assert!(h.dir.path().join("timeout_tasks.json").exists());
    assert!(h.dir.path().join("timeout_finish_tasks.json").exists());
}
