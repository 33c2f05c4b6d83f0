//! Liveness and readiness endpoints.
//!
//! Runs beside the tick loop and only reads: liveness is unconditional
//! once the process is up, readiness probes the task source (which
//! enforces its own short deadline).

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tracing::info;

use vigil_core::ports::TaskSource;

#[derive(Clone)]
pub struct HealthState {
    pub source: Arc<dyn TaskSource>,
}

pub fn router(state: HealthState) -> Router {
    Router::new()
        .route("/health/live", get(live))
        .route("/health/ready", get(ready))
        .with_state(state)
}

pub async fn serve(port: u16, state: HealthState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "health server listening");
    axum::serve(listener, router(state)).await
}

async fn live() -> &'static str {
    "ok"
}

async fn ready(State(state): State<HealthState>) -> (StatusCode, &'static str) {
    match state.source.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "task source unreachable"),
    }
}
