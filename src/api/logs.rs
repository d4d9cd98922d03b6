//! Delivery log inspection endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::delivery::DeliveryAttempt;
use crate::error::Result;
use crate::server::AppState;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

#[derive(Debug, Default, Deserialize)]
pub struct EmailLogQuery {
    pub limit: Option<usize>,
}

impl EmailLogQuery {
    /// Requested page size, clamped to `1..=200`
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

#[derive(Debug, Serialize)]
pub struct EmailLogListResponse {
    pub logs: Vec<DeliveryAttempt>,
    pub total: usize,
}

/// GET /api/email-logs - Most recent delivery attempts, newest first
#[tracing::instrument(name = "http.list_email_logs", skip(state))]
pub async fn list_email_logs(
    State(state): State<AppState>,
    Query(query): Query<EmailLogQuery>,
) -> Result<Json<EmailLogListResponse>> {
    let logs = state.delivery_log.recent(query.effective_limit()).await?;
    let total = logs.len();

    Ok(Json(EmailLogListResponse { logs, total }))
}
