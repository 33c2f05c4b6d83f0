//! vigil-daemon: the scheduled workflow-task timeout monitor.
//!
//! Wiring only — all decision logic lives in vigil-core. A single worker
//! loop drives one engine tick per interval (cycles never overlap); a
//! second task serves the health endpoints; SIGINT/SIGTERM trigger one
//! final synchronous save before exit.

mod config;
mod health;
mod source;
mod webhook;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal::unix::{SignalKind, signal};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use vigil_core::app::engine::Engine;
use vigil_core::ports::{SystemClock, TaskSource};
use vigil_core::snapshot::Snapshotter;

use crate::config::Config;
use crate::source::PgTaskSource;
use crate::webhook::WebhookNotifier;

/// Whole-cycle deadline: a stalled query or webhook aborts the tick, the
/// loop resumes on the next interval.
const CYCLE_DEADLINE: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;

    // The connection pool is the only fatal dependency: without the task
    // table there is nothing to classify.
    let source = Arc::new(
        PgTaskSource::connect(
            &config.database_url,
            config.proc_key.clone(),
            config.task_keys.clone(),
        )
        .await
        .context("establishing database connection pool")?,
    );

    let notifier = Arc::new(
        WebhookNotifier::new(
            config.webhook_unclaimed.clone(),
            config.webhook_unfinished.clone(),
            config.webhook_summary.clone(),
        )
        .context("building webhook client")?,
    );

    let engine = Arc::new(Engine::new(
        SystemClock,
        config.engine_config(),
        source.clone() as Arc<dyn TaskSource>,
        notifier,
        Snapshotter::new(&config.persist_path),
    ));
    engine.restore().await;

    let health_state = health::HealthState {
        source: source as Arc<dyn TaskSource>,
    };
    let health_port = config.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::serve(health_port, health_state).await {
            error!(error = %e, "health server exited");
        }
    });

    let mut sigterm = signal(SignalKind::terminate()).context("installing SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("installing SIGINT handler")?;

    let mut ticker = tokio::time::interval(Duration::from_secs(config.poll_interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        interval_secs = config.poll_interval_secs,
        persist_path = %config.persist_path,
        "monitor started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match tokio::time::timeout(CYCLE_DEADLINE, engine.tick()).await {
                    Ok(report) => debug!(?report, "cycle complete"),
                    Err(_) => warn!("cycle exceeded deadline, resuming on next tick"),
                }
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received");
                break;
            }
            _ = sigint.recv() => {
                info!("SIGINT received");
                break;
            }
        }
    }

    // One final save; in-flight alert dispatch is not waited for.
    if let Err(e) = engine.save_now().await {
        error!(error = %e, "final snapshot failed");
    }
    info!("monitor stopped");
    Ok(())
}
