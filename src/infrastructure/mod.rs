// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod csv_export;
pub mod endpoints;
pub mod error;
pub mod http_client;
