//! Template store factory

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::postgres::PostgresPool;

use super::postgres_store::PostgresTemplateStore;
use super::store::{MemoryTemplateStore, StoreError, TemplateStore};

/// Create a template store based on configuration.
///
/// - `"postgres"`: Returns a `PostgresTemplateStore` if a pool is provided
///   (falls back to memory otherwise; `AppState::from_settings` refuses
///   that case)
/// - `"memory"` (default): Returns a `MemoryTemplateStore`, seeded from
///   `seed_file` when configured
pub async fn create_template_store(
    settings: &StorageConfig,
    postgres_pool: Option<Arc<PostgresPool>>,
) -> Result<Arc<dyn TemplateStore>, StoreError> {
    if settings.backend == "postgres" {
        if let Some(pool) = postgres_pool {
            tracing::info!(backend = "postgres", "Creating PostgreSQL template store");
            return Ok(Arc::new(PostgresTemplateStore::new(pool.pool().clone())));
        }
        tracing::warn!(
            "PostgreSQL template store requested but no pool provided, falling back to memory"
        );
    }

    let store = match &settings.seed_file {
        Some(path) => MemoryTemplateStore::from_json_file(path).await?,
        None => MemoryTemplateStore::new(),
    };

    tracing::info!(
        backend = "memory",
        templates = store.count(),
        "Creating memory template store"
    );
    Ok(Arc::new(store))
}
