use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .route("/metrics", get(metrics))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "risk-analyzer",
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSecs": state.uptime_secs(),
    }))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Ready once the active config is readable and valid.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.engine().get_config().await.validate() {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::error!(error = %e, "active analysis config is invalid");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.engine().metrics_registry().snapshot();
    Json(serde_json::json!({
        "stages": snapshot,
    }))
}
