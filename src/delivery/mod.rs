//! Delivery log: an append-only audit trail of dispatch attempts.
//!
//! # Backend Architecture
//!
//! - `MemoryDeliveryLog`: Bounded in-process ring buffer (default, lost on restart)
//! - `PostgresDeliveryLog`: Rows in the `email_logs` table
//!
//! Use `create_delivery_log()` to pick the backend from configuration.

mod memory;
mod postgres_log;
mod types;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StorageConfig;
use crate::postgres::PostgresPool;
use crate::template::StoreError;

pub use memory::MemoryDeliveryLog;
pub use postgres_log::PostgresDeliveryLog;
pub use types::{AttemptDetails, DeliveryAttempt, DeliveryStatus};

/// Append-only record of attempted sends.
#[async_trait]
pub trait DeliveryLog: Send + Sync {
    /// Persist one attempt. Entries are never updated afterwards.
    async fn append(&self, attempt: &DeliveryAttempt) -> Result<(), StoreError>;

    /// Most recent attempts, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<DeliveryAttempt>, StoreError>;
}

/// Create a delivery log backend based on configuration.
///
/// - `"postgres"`: Returns a `PostgresDeliveryLog` if a pool is provided
///   (falls back to memory otherwise; `AppState::from_settings` refuses
///   that case)
/// - `"memory"` (default): Returns a `MemoryDeliveryLog`
pub fn create_delivery_log(
    settings: &StorageConfig,
    postgres_pool: Option<Arc<PostgresPool>>,
) -> Arc<dyn DeliveryLog> {
    match settings.backend.as_str() {
        "postgres" => {
            if let Some(pool) = postgres_pool {
                tracing::info!(backend = "postgres", "Creating PostgreSQL delivery log");
                Arc::new(PostgresDeliveryLog::new(pool.pool().clone()))
            } else {
                tracing::warn!(
                    "PostgreSQL delivery log requested but no pool provided, falling back to memory"
                );
                Arc::new(MemoryDeliveryLog::new())
            }
        }
        _ => {
            tracing::info!(backend = "memory", "Creating memory delivery log");
            Arc::new(MemoryDeliveryLog::new())
        }
    }
}
