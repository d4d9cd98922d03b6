// Infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod postgres;
pub mod telemetry;

// Domain
pub mod delivery;
pub mod gateway;
pub mod notification;
pub mod template;

// Application layer
pub mod api;
pub mod server;
