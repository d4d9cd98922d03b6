use thiserror::Error;
use uuid::Uuid;

use crate::template::{StoreError, Variables};

/// A request to render and deliver one templated email.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationRequest {
    pub template_name: String,
    pub recipient_email: String,
    pub recipient_name: Option<String>,
    pub variables: Variables,
}

impl NotificationRequest {
    pub fn new(template_name: impl Into<String>, recipient_email: impl Into<String>) -> Self {
        Self {
            template_name: template_name.into(),
            recipient_email: recipient_email.into(),
            recipient_name: None,
            variables: Variables::new(),
        }
    }

    pub fn recipient_name(mut self, name: impl Into<String>) -> Self {
        self.recipient_name = Some(name.into());
        self
    }

    pub fn variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    /// Trim the template name and recipient address, and drop a blank
    /// recipient name. The dispatcher validates and uses the trimmed values.
    pub fn normalized(mut self) -> Self {
        self.template_name = self.template_name.trim().to_string();
        self.recipient_email = self.recipient_email.trim().to_string();
        self.recipient_name = self
            .recipient_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        self
    }

    /// Reject requests missing a template name or recipient address
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.template_name.trim().is_empty() {
            return Err(DispatchError::Validation(
                "templateName is required".to_string(),
            ));
        }

        if self.recipient_email.trim().is_empty() {
            return Err(DispatchError::Validation(
                "recipientEmail is required".to_string(),
            ));
        }

        Ok(())
    }
}

/// Successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    /// Provider message id
    pub id: String,
    /// Delivery log entry id
    pub log_id: Uuid,
}

/// Why a dispatch did not result in a delivered email
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Bad caller input; nothing was read or sent
    #[error("{0}")]
    Validation(String),

    /// No active template with this name; nothing was sent or logged
    #[error("Email template not found: {0}")]
    TemplateNotFound(String),

    /// The provider rejected the message; a failed attempt was logged
    #[error("{message}")]
    Gateway { message: String, log_id: Uuid },

    /// Template lookup failed
    #[error("Template store error: {0}")]
    Store(#[from] StoreError),
}
