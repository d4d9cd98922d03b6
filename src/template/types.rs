//! Template types and request variables

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::render::{placeholders, render};

/// Variables substituted into a template, keyed by placeholder name.
///
/// Ordered so that the audit metadata written to the delivery log is stable.
pub type Variables = BTreeMap<String, String>;

/// An email template as administered out-of-band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailTemplate {
    /// Storage identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Unique lookup key, e.g. `booking_confirmation`
    pub name: String,

    /// Subject line with {{variable}} placeholders
    pub subject: String,

    /// HTML body with {{variable}} placeholders
    pub html_content: String,

    /// Optional plaintext body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// Inactive templates are never used for dispatch
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl EmailTemplate {
    /// Create an active template without a plaintext body
    pub fn new(
        name: impl Into<String>,
        subject: impl Into<String>,
        html_content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            subject: subject.into(),
            html_content: html_content.into(),
            text_content: None,
            is_active: true,
            updated_at: Utc::now(),
        }
    }

    pub fn with_text(mut self, text_content: impl Into<String>) -> Self {
        self.text_content = Some(text_content.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Render subject, HTML and plaintext bodies with the same variables
    pub fn render(&self, variables: &Variables) -> RenderedEmail {
        RenderedEmail {
            subject: render(&self.subject, variables),
            html: render(&self.html_content, variables),
            text: self.text_content.as_deref().map(|t| render(t, variables)),
        }
    }

    /// Placeholder keys used anywhere in the template but absent from `variables`
    pub fn missing_variables(&self, variables: &Variables) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        let parts = [
            Some(self.subject.as_str()),
            Some(self.html_content.as_str()),
            self.text_content.as_deref(),
        ];

        for key in parts.into_iter().flatten().flat_map(placeholders) {
            if !variables.contains_key(&key) && !missing.contains(&key) {
                missing.push(key);
            }
        }

        missing
    }
}

/// A template after variable substitution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Response for listing templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<EmailTemplate>,
    pub total: usize,
}

/// Deserialize a JSON object of variables into string values.
///
/// `null` or a missing field yields an empty mapping. Numbers and booleans are
/// stringified, `null` values become empty strings, and nested arrays or
/// objects keep their JSON representation.
pub fn deserialize_variables<'de, D>(deserializer: D) -> Result<Variables, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Map<String, serde_json::Value>> =
        Option::deserialize(deserializer)?;

    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}
