//! Outbound email delivery.
//!
//! A gateway is built once at startup from `EmailConfig` and injected into the
//! dispatcher. Missing credentials fail construction; provider-reported
//! failures never surface as errors from [`EmailGateway::send`] and are
//! reported through [`DeliveryOutcome::Rejected`] instead.

mod log_sink;
mod resend;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::EmailConfig;

pub use log_sink::LogGateway;
pub use resend::ResendGateway;

/// Errors raised while constructing a gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Email provider is not configured: {0}")]
    Configuration(String),

    #[error("Unknown email provider: {0}")]
    UnknownProvider(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// A rendered message ready for the provider
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
}

/// Result of a single provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Accepted by the provider under the given message id
    Delivered { id: String },
    /// Rejected by the provider, or the provider could not be reached
    Rejected { error: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Transactional email provider
#[async_trait]
pub trait EmailGateway: Send + Sync {
    /// Provider name for logs and metrics
    fn name(&self) -> &'static str;

    /// Attempt delivery exactly once
    async fn send(&self, email: &OutgoingEmail) -> DeliveryOutcome;
}

/// Create the configured gateway.
///
/// - `"resend"` (default): Resend HTTP API, requires `api_key` and `from`
/// - `"log"`: Writes messages to the trace log, for local development
pub fn create_gateway(config: &EmailConfig) -> Result<Arc<dyn EmailGateway>, GatewayError> {
    match config.provider.as_str() {
        "resend" => {
            let gateway = ResendGateway::new(config)?;
            tracing::info!(provider = "resend", endpoint = %gateway.endpoint(), "Email gateway ready");
            Ok(Arc::new(gateway))
        }
        "log" => {
            tracing::warn!(provider = "log", "Emails will be logged, not delivered");
            Ok(Arc::new(LogGateway::new()))
        }
        other => Err(GatewayError::UnknownProvider(other.to_string())),
    }
}
