use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::template::Variables;

/// Outcome recorded for a dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sent" => Some(DeliveryStatus::Sent),
            "failed" => Some(DeliveryStatus::Failed),
            _ => None,
        }
    }
}

/// Everything known about an attempt before the gateway answers
#[derive(Debug, Clone)]
pub struct AttemptDetails {
    pub template_id: Uuid,
    pub template_name: String,
    pub recipient_email: String,
    pub recipient_name: Option<String>,
    /// Rendered subject line
    pub subject: String,
    /// Raw request variables, kept for audit
    pub variables: Variables,
}

impl AttemptDetails {
    /// The provider accepted the message
    pub fn sent(self, provider_message_id: impl Into<String>) -> DeliveryAttempt {
        self.finish(
            DeliveryStatus::Sent,
            Some(provider_message_id.into()),
            None,
            Some(Utc::now()),
        )
    }

    /// The provider rejected the message or could not be reached
    pub fn failed(self, error_message: impl Into<String>) -> DeliveryAttempt {
        self.finish(DeliveryStatus::Failed, None, Some(error_message.into()), None)
    }

    fn finish(
        self,
        status: DeliveryStatus,
        provider_message_id: Option<String>,
        error_message: Option<String>,
        sent_at: Option<DateTime<Utc>>,
    ) -> DeliveryAttempt {
        DeliveryAttempt {
            id: Uuid::new_v4(),
            template_id: self.template_id,
            template_name: self.template_name,
            recipient_email: self.recipient_email,
            recipient_name: self.recipient_name,
            subject: self.subject,
            status,
            provider_message_id,
            error_message,
            metadata: serde_json::json!({ "variables": self.variables }),
            sent_at,
            created_at: Utc::now(),
        }
    }
}

/// One row of the delivery log.
///
/// Built only through [`AttemptDetails::sent`] and [`AttemptDetails::failed`]
/// (or loaded back from storage), so `Sent` always carries a provider id and
/// `sent_at`, and `Failed` always carries an error and no `sent_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    pub id: Uuid,
    pub template_id: Uuid,
    pub template_name: String,
    pub recipient_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    pub subject: String,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub metadata: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DeliveryAttempt {
    pub fn is_sent(&self) -> bool {
        self.status == DeliveryStatus::Sent
    }
}
