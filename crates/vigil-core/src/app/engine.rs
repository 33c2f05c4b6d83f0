//! Engine: owns all mutable monitor state and runs one tick at a time.
//!
//! The engine is constructed once at process start and shared by `Arc`;
//! there are no ambient globals. Each structure sits behind its own lock
//! (multiple readers / single writer): snapshotting and summary counting
//! read the classifier, the tick writes it. The driving loop must not
//! re-enter `tick` concurrently — cycles are serialized by running them
//! on a single worker, not by a cycle-level mutex here.
//!
//! # Tick order
//! 1. daily cycle (summary + reset, at most once per day)
//! 2. fetch → classify (source failure: warn and skip, state untouched)
//! 3. working-hours gate → cooldown gate → notify
//! 4. interval snapshot (tracked by last-save timestamp, no extra timer)

use chrono::{DateTime, Duration, Local};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::app::classifier::{Classification, TimeoutClassifier};
use crate::app::cooldown::CooldownTracker;
use crate::app::daily::{self, DailyCycle, SummaryWindow};
use crate::app::{hours, message};
use crate::domain::{Task, TaskCategory, Thresholds};
use crate::error::SnapshotError;
use crate::ports::{AlertKind, Clock, Notifier, TaskSource};
use crate::snapshot::Snapshotter;

/// Tunable policy for one engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub thresholds: Thresholds,
    pub cooldown: Duration,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub summary: SummaryWindow,
    pub save_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            cooldown: Duration::minutes(10),
            work_start_hour: 9,
            work_end_hour: 21,
            summary: SummaryWindow::default(),
            save_interval: Duration::minutes(10),
        }
    }
}

/// What one tick did, for logging and tests.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub source_ok: bool,
    pub fetched: usize,
    pub timed_out_unclaimed: usize,
    pub timed_out_unfinished: usize,
    pub alerted_unclaimed: usize,
    pub alerted_unfinished: usize,
    pub summary_fired: bool,
    pub saved: bool,
}

/// The timeout classification and alert-deduplication engine.
pub struct Engine<C: Clock> {
    clock: C,
    config: EngineConfig,
    source: Arc<dyn TaskSource>,
    notifier: Arc<dyn Notifier>,
    snapshotter: Snapshotter,

    classifier: RwLock<TimeoutClassifier>,
    cooldown_unclaimed: Mutex<CooldownTracker>,
    cooldown_unfinished: Mutex<CooldownTracker>,
    daily: Mutex<DailyCycle>,
    last_save: Mutex<DateTime<Local>>,
}

impl<C: Clock> Engine<C> {
    pub fn new(
        clock: C,
        config: EngineConfig,
        source: Arc<dyn TaskSource>,
        notifier: Arc<dyn Notifier>,
        snapshotter: Snapshotter,
    ) -> Self {
        let started_at = clock.now();
        Self {
            clock,
            config,
            source,
            notifier,
            snapshotter,
            classifier: RwLock::new(TimeoutClassifier::new()),
            cooldown_unclaimed: Mutex::new(CooldownTracker::new()),
            cooldown_unfinished: Mutex::new(CooldownTracker::new()),
            daily: Mutex::new(DailyCycle::new()),
            last_save: Mutex::new(started_at),
        }
    }

    /// Run one classification-and-alert cycle. Never fatal: collaborator
    /// failures are logged and the cycle degrades (skip classification,
    /// drop a message, skip a save) rather than aborting the process.
    pub async fn tick(&self) -> TickReport {
        let now = self.clock.now();
        let mut report = TickReport::default();

        report.summary_fired = self.run_daily_cycle(now).await;

        match self.source.fetch().await {
            Ok(tasks) => {
                report.source_ok = true;
                report.fetched = tasks.len();

                let (unclaimed, unfinished) = {
                    let mut classifier = self.classifier.write().await;
                    classifier.classify(&tasks, now, &self.config.thresholds)
                };
                report.timed_out_unclaimed = unclaimed.timed_out.len();
                report.timed_out_unfinished = unfinished.timed_out.len();

                if hours::in_window(now, self.config.work_start_hour, self.config.work_end_hour) {
                    report.alerted_unclaimed = self
                        .dispatch_alerts(TaskCategory::Unclaimed, &unclaimed, now)
                        .await;
                    report.alerted_unfinished = self
                        .dispatch_alerts(TaskCategory::Unfinished, &unfinished, now)
                        .await;
                }
            }
            Err(e) => {
                warn!(error = %e, "task fetch failed, skipping classification this tick");
            }
        }

        report.saved = self.maybe_save(now).await;
        report
    }

    /// Gate `timed_out` through the cooldown tracker and dispatch one
    /// message covering every task that passed. Returns how many tasks
    /// were alerted.
    ///
    /// The cooldown entry is written at dispatch, before delivery is
    /// confirmed: a failed webhook still suppresses a retry inside the
    /// window, which keeps a flapping endpoint from causing alert storms.
    async fn dispatch_alerts(
        &self,
        category: TaskCategory,
        classification: &Classification,
        now: DateTime<Local>,
    ) -> usize {
        if classification.timed_out.is_empty() {
            return 0;
        }

        let alerted: Vec<Task> = {
            let mut tracker = self.cooldown(category).lock().await;
            let mut picked = Vec::new();
            for task in &classification.timed_out {
                if tracker.should_alert(&task.id, now, self.config.cooldown) {
                    tracker.record_alert(&task.id, now);
                    picked.push(task.clone());
                }
            }
            picked
        };
        if alerted.is_empty() {
            return 0;
        }

        let body = message::timeout_alert(
            category,
            &alerted,
            classification.timed_out.len(),
            classification.cumulative,
        );
        let kind = match category {
            TaskCategory::Unclaimed => AlertKind::UnclaimedTimeout,
            TaskCategory::Unfinished => AlertKind::UnfinishedTimeout,
        };
        if let Err(e) = self.notifier.send(kind, &body).await {
            warn!(%kind, error = %e, "alert delivery failed (cooldown already recorded)");
        }
        alerted.len()
    }

    /// Day rollover plus the once-per-day summary-and-reset. Returns true
    /// when the summary fired this tick.
    async fn run_daily_cycle(&self, now: DateTime<Local>) -> bool {
        let mut daily = self.daily.lock().await;
        daily.roll_over(now);
        if !daily.should_fire(now, self.config.summary) {
            return false;
        }

        let count = {
            let classifier = self.classifier.read().await;
            daily::count_recent_working_hours(classifier.ledger(TaskCategory::Unfinished), now)
        };
        let body = message::daily_summary(now, count);
        if let Err(e) = self.notifier.send(AlertKind::DailySummary, &body).await {
            warn!(error = %e, "daily summary delivery failed");
        }

        // The reset is tied to the firing, not to delivery success, so a
        // broken webhook cannot make counts accumulate across days.
        self.classifier.write().await.clear_all();
        daily.mark_done();
        info!(count, "daily summary fired, ledgers reset");
        true
    }

    /// Save when the interval has elapsed since the last save.
    async fn maybe_save(&self, now: DateTime<Local>) -> bool {
        {
            let mut last_save = self.last_save.lock().await;
            if now.signed_duration_since(*last_save) <= self.config.save_interval {
                return false;
            }
            *last_save = now;
        }
        if let Err(e) = self.save_now().await {
            warn!(error = %e, "interval snapshot failed");
        }
        true
    }

    /// Snapshot both ledgers immediately. Used by the interval logic and
    /// unconditionally during graceful shutdown.
    pub async fn save_now(&self) -> Result<(), SnapshotError> {
        let classifier = self.classifier.read().await;
        let mut first_err = None;
        for category in [TaskCategory::Unclaimed, TaskCategory::Unfinished] {
            if let Err(e) = self.snapshotter.save(category, classifier.ledger(category)) {
                warn!(%category, error = %e, "snapshot save failed");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    /// Restore both ledgers at startup. Load failure falls back to an
    /// empty ledger rather than aborting.
    pub async fn restore(&self) {
        let mut classifier = self.classifier.write().await;
        for category in [TaskCategory::Unclaimed, TaskCategory::Unfinished] {
            match self.snapshotter.load(category) {
                Ok(ledger) => classifier.restore(category, ledger),
                Err(e) => {
                    warn!(%category, error = %e, "snapshot load failed, starting empty");
                }
            }
        }
    }

    /// Cumulative timeout count for a category since the daily reset.
    pub async fn cumulative(&self, category: TaskCategory) -> usize {
        self.classifier.read().await.ledger(category).len()
    }

    /// Number of live cooldown entries for a category.
    pub async fn cooldown_entries(&self, category: TaskCategory) -> usize {
        self.cooldown(category).lock().await.len()
    }

    fn cooldown(&self, category: TaskCategory) -> &Mutex<CooldownTracker> {
        match category {
            TaskCategory::Unclaimed => &self.cooldown_unclaimed,
            TaskCategory::Unfinished => &self.cooldown_unfinished,
        }
    }
}
