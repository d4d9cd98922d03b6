use std::sync::Arc;

use crate::config::Settings;
use crate::delivery::{create_delivery_log, DeliveryLog};
use crate::gateway::{create_gateway, EmailGateway, GatewayError};
use crate::notification::EmailDispatcher;
use crate::postgres::PostgresPool;
use crate::template::{create_template_store, StoreError, TemplateStore};

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to connect to PostgreSQL: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage.backend is \"postgres\" but no database pool is available")]
    PostgresUnavailable,
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub templates: Arc<dyn TemplateStore>,
    pub delivery_log: Arc<dyn DeliveryLog>,
    pub dispatcher: Arc<EmailDispatcher>,
}

impl AppState {
    /// Wire the dispatcher from explicit collaborators
    pub fn new(
        settings: Settings,
        templates: Arc<dyn TemplateStore>,
        gateway: Arc<dyn EmailGateway>,
        delivery_log: Arc<dyn DeliveryLog>,
    ) -> Self {
        let dispatcher = Arc::new(EmailDispatcher::new(
            templates.clone(),
            gateway,
            delivery_log.clone(),
        ));

        Self {
            settings: Arc::new(settings),
            templates,
            delivery_log,
            dispatcher,
        }
    }

    /// Connect to PostgreSQL when it is the configured storage backend.
    ///
    /// Returns `None` for the memory backend. An unreachable database is an
    /// error; the service never swaps in memory storage for a configured
    /// database.
    pub async fn connect_storage(
        settings: &Settings,
    ) -> Result<Option<Arc<PostgresPool>>, StateError> {
        if settings.storage.backend != "postgres" {
            return Ok(None);
        }

        let pool = PostgresPool::new(&settings.database).await?;
        tracing::info!(url = %pool.database_url_masked(), "PostgreSQL connected");
        Ok(Some(Arc::new(pool)))
    }

    /// Build every collaborator from configuration.
    ///
    /// Fails when the email provider is misconfigured, so a missing API key
    /// stops the service at startup instead of on the first request. Also
    /// fails when PostgreSQL storage is configured without a pool.
    pub async fn from_settings(
        settings: Settings,
        postgres_pool: Option<Arc<PostgresPool>>,
    ) -> Result<Self, StateError> {
        if settings.storage.backend == "postgres" && postgres_pool.is_none() {
            return Err(StateError::PostgresUnavailable);
        }

        let gateway = create_gateway(&settings.email)?;
        let templates = create_template_store(&settings.storage, postgres_pool.clone()).await?;
        let delivery_log = create_delivery_log(&settings.storage, postgres_pool);

        Ok(Self::new(settings, templates, gateway, delivery_log))
    }
}
