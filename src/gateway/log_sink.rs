use async_trait::async_trait;
use uuid::Uuid;

use super::{DeliveryOutcome, EmailGateway, OutgoingEmail};

/// Development gateway that records messages in the trace log
#[derive(Debug, Default)]
pub struct LogGateway;

impl LogGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailGateway for LogGateway {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, email: &OutgoingEmail) -> DeliveryOutcome {
        let id = format!("log-{}", Uuid::new_v4());

        tracing::info!(
            message_id = %id,
            to = %email.to,
            subject = %email.subject,
            html_bytes = email.html.len(),
            has_text = email.text.is_some(),
            "Email captured by log gateway"
        );

        DeliveryOutcome::Delivered { id }
    }
}
