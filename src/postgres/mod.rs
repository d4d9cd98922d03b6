//! PostgreSQL persistence module.
//!
//! Provides the shared connection pool for the template store and delivery log.

pub mod pool;

pub use pool::{mask_database_url, PostgresPool};
