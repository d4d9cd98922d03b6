//! API layer - HTTP endpoint handlers organized by concern.

mod health;
mod logs;
mod metrics;
mod routes;
mod send_email;
mod template;

pub use health::{health, stats, HealthResponse};
pub use logs::{list_email_logs, EmailLogListResponse, EmailLogQuery};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use send_email::{send_email, SendEmailRequest, SendEmailResponse};
pub use template::{list_templates, preview_template, PreviewRequest, PreviewResponse};
