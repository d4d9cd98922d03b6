//! PostgreSQL-backed template store.
//!
//! Reads the `email_templates` table maintained by the admin panel:
//! `id UUID, name TEXT UNIQUE, subject TEXT, html_content TEXT,
//! text_content TEXT NULL, is_active BOOLEAN, updated_at TIMESTAMPTZ`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::store::{StoreError, TemplateStore};
use super::types::EmailTemplate;

type TemplateRow = (
    Uuid,
    String,
    String,
    String,
    Option<String>,
    bool,
    DateTime<Utc>,
);

fn from_row(row: TemplateRow) -> EmailTemplate {
    let (id, name, subject, html_content, text_content, is_active, updated_at) = row;
    EmailTemplate {
        id,
        name,
        subject,
        html_content,
        text_content,
        is_active,
        updated_at,
    }
}

/// Template store reading from PostgreSQL
pub struct PostgresTemplateStore {
    pool: PgPool,
}

impl PostgresTemplateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for PostgresTemplateStore {
    async fn find_active(&self, name: &str) -> Result<Option<EmailTemplate>, StoreError> {
        let row: Option<TemplateRow> = sqlx::query_as(
            r#"
            SELECT id, name, subject, html_content, text_content, is_active, updated_at
            FROM email_templates
            WHERE name = $1 AND is_active = TRUE
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    async fn list(&self) -> Result<Vec<EmailTemplate>, StoreError> {
        let rows: Vec<TemplateRow> = sqlx::query_as(
            r#"
            SELECT id, name, subject, html_content, text_content, is_active, updated_at
            FROM email_templates
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }
}
