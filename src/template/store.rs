//! Template storage abstraction and in-memory backend

use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

use super::types::EmailTemplate;

/// Errors raised by template and delivery log storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// PostgreSQL operation failed
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Seed file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only access to administered email templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Point lookup by `(name, is_active = true)`.
    ///
    /// Returns `Ok(None)` for absent and for inactive templates alike.
    async fn find_active(&self, name: &str) -> Result<Option<EmailTemplate>, StoreError>;

    /// All templates, active or not, ordered by name
    async fn list(&self) -> Result<Vec<EmailTemplate>, StoreError>;
}

/// In-memory template store.
///
/// Templates are lost on restart; intended for development and tests, or
/// seeded from a JSON file at startup.
pub struct MemoryTemplateStore {
    templates: DashMap<String, EmailTemplate>,
}

impl Default for MemoryTemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
        }
    }

    /// Build a store from a list of templates; later entries replace earlier
    /// ones with the same name
    pub fn with_templates(templates: impl IntoIterator<Item = EmailTemplate>) -> Self {
        let store = Self::new();
        for template in templates {
            store.upsert(template);
        }
        store
    }

    /// Load templates from a JSON array file
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let templates: Vec<EmailTemplate> = serde_json::from_str(&raw)?;

        tracing::info!(
            path = %path.as_ref().display(),
            count = templates.len(),
            "Loaded email templates from seed file"
        );

        Ok(Self::with_templates(templates))
    }

    /// Insert or replace a template by name
    pub fn upsert(&self, template: EmailTemplate) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Number of stored templates, active or not
    pub fn count(&self) -> usize {
        self.templates.len()
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn find_active(&self, name: &str) -> Result<Option<EmailTemplate>, StoreError> {
        Ok(self
            .templates
            .get(name)
            .filter(|t| t.is_active)
            .map(|t| t.clone()))
    }

    async fn list(&self) -> Result<Vec<EmailTemplate>, StoreError> {
        let mut templates: Vec<EmailTemplate> = self
            .templates
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }
}
