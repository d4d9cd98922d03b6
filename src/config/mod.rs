mod settings;

pub use settings::{
    ApiConfig, DatabaseConfig, EmailConfig, OtelConfig, ServerConfig, Settings, StorageConfig,
};
