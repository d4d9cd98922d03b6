//! Health check and statistics endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::notification::DispatcherStatsSnapshot;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
    pub email_provider: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub emails: DispatcherStatsSnapshot,
}

/// GET /health - Liveness check
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.settings.storage.backend.clone(),
        email_provider: state.settings.email.provider.clone(),
    })
}

/// GET /stats - Dispatcher counters
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        emails: state.dispatcher.stats(),
    })
}
