/// Database configuration and connection management
pub mod database;

/// Lending limits and display settings loaded from config.toml
pub mod lending;

/// Administrator Discord IDs from environment variables
pub mod admins;

pub use lending::{AppConfig, LendingConfig};
