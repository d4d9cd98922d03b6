//! PostgreSQL-backed delivery log.
//!
//! Appends rows to `email_logs` with the variables stored as JSONB metadata.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::template::StoreError;

use super::{DeliveryAttempt, DeliveryLog, DeliveryStatus};

type LogRow = (
    Uuid,
    Uuid,
    String,
    String,
    Option<String>,
    String,
    String,
    Option<String>,
    Option<String>,
    serde_json::Value,
    Option<DateTime<Utc>>,
    DateTime<Utc>,
);

/// Delivery log writing to PostgreSQL
pub struct PostgresDeliveryLog {
    pool: PgPool,
}

impl PostgresDeliveryLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeliveryLog for PostgresDeliveryLog {
    async fn append(&self, attempt: &DeliveryAttempt) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO email_logs (
                id, template_id, template_name, recipient_email, recipient_name, subject,
                status, provider_message_id, error_message, metadata, sent_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(attempt.id)
        .bind(attempt.template_id)
        .bind(&attempt.template_name)
        .bind(&attempt.recipient_email)
        .bind(&attempt.recipient_name)
        .bind(&attempt.subject)
        .bind(attempt.status.as_str())
        .bind(&attempt.provider_message_id)
        .bind(&attempt.error_message)
        .bind(&attempt.metadata)
        .bind(attempt.sent_at)
        .bind(attempt.created_at)
        .execute(&self.pool)
        .await?;

        tracing::trace!(
            log_id = %attempt.id,
            status = attempt.status.as_str(),
            "Delivery attempt written to PostgreSQL"
        );

        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<DeliveryAttempt>, StoreError> {
        let rows: Vec<LogRow> = sqlx::query_as(
            r#"
            SELECT id, template_id, template_name, recipient_email, recipient_name, subject,
                   status, provider_message_id, error_message, metadata, sent_at, created_at
            FROM email_logs
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let (
                    id,
                    template_id,
                    template_name,
                    recipient_email,
                    recipient_name,
                    subject,
                    status,
                    provider_message_id,
                    error_message,
                    metadata,
                    sent_at,
                    created_at,
                ) = row;

                let Some(status) = DeliveryStatus::parse(&status) else {
                    tracing::warn!(log_id = %id, status = %status, "Unknown delivery status, skipping");
                    return None;
                };

                Some(DeliveryAttempt {
                    id,
                    template_id,
                    template_name,
                    recipient_email,
                    recipient_name,
                    subject,
                    status,
                    provider_message_id,
                    error_message,
                    metadata,
                    sent_at,
                    created_at,
                })
            })
            .collect())
    }
}
