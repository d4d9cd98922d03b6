//! Resend HTTP API adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::EmailConfig;

use super::{DeliveryOutcome, EmailGateway, GatewayError, OutgoingEmail};

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

/// Gateway posting to `{api_base_url}/emails`
pub struct ResendGateway {
    http: Client,
    endpoint: String,
    api_key: String,
    from: String,
    reply_to: Option<String>,
}

impl std::fmt::Debug for ResendGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendGateway")
            .field("endpoint", &self.endpoint)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl ResendGateway {
    /// Validate credentials and build the HTTP client.
    pub fn new(config: &EmailConfig) -> Result<Self, GatewayError> {
        let api_key = non_empty(config.api_key.as_deref()).ok_or_else(|| {
            GatewayError::Configuration(
                "missing API key (set RESEND_API_KEY or EMAIL__API_KEY)".to_string(),
            )
        })?;

        let from = non_empty(config.from.as_deref()).ok_or_else(|| {
            GatewayError::Configuration("missing sender address (set EMAIL__FROM)".to_string())
        })?;

        let http = Client::builder()
            .user_agent(concat!("villa-mail-service/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/emails", config.api_base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            from: from.to_string(),
            reply_to: non_empty(config.reply_to.as_deref()).map(str::to_string),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[async_trait]
impl EmailGateway for ResendGateway {
    fn name(&self) -> &'static str {
        "resend"
    }

    #[tracing::instrument(name = "gateway.resend.send", skip(self, email), fields(to = %email.to))]
    async fn send(&self, email: &OutgoingEmail) -> DeliveryOutcome {
        let body = SendEmailBody {
            from: &self.from,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
            text: email.text.as_deref(),
            reply_to: self.reply_to.as_deref(),
        };

        let response = match self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Email provider request failed");
                return DeliveryOutcome::Rejected {
                    error: format!("Email provider request failed: {}", e),
                };
            }
        };

        let status = response.status();
        if status.is_success() {
            return match response.json::<SendEmailResponse>().await {
                Ok(body) if body.id.trim().is_empty() => {
                    tracing::warn!(status = status.as_u16(), "Email provider returned no message id");
                    DeliveryOutcome::Rejected {
                        error: "Email provider returned no message id".to_string(),
                    }
                }
                Ok(body) => DeliveryOutcome::Delivered { id: body.id },
                Err(e) => DeliveryOutcome::Rejected {
                    error: format!("Unreadable email provider response: {}", e),
                },
            };
        }

        let message = response
            .json::<ProviderErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("Email provider returned {}", status));

        tracing::warn!(status = status.as_u16(), error = %message, "Email provider rejected message");

        DeliveryOutcome::Rejected { error: message }
    }
}
