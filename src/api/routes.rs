use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::server::{api_key_auth, AppState};

use super::health::{health, stats};
use super::logs::list_email_logs;
use super::metrics::prometheus_metrics;
use super::send_email::send_email;
use super::template::{list_templates, preview_template};

pub fn api_routes(state: AppState) -> Router<AppState> {
    let api = Router::new()
        .route("/send-email", post(send_email))
        .route("/email-templates", get(list_templates))
        .route("/email-templates/{name}/preview", post(preview_template))
        .route("/email-logs", get(list_email_logs))
        .route_layer(middleware::from_fn_with_state(state, api_key_auth));

    Router::new()
        // Health & Stats
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        .nest("/api", api)
}
