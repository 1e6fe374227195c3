//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the SaccoBuddy application,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (member, loan, insurance, admin, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{config::AppConfig, errors::Error};
use sea_orm::DatabaseConnection;
use tracing::error;

/// Shared data available to all bot commands.
/// This structure holds the database connection and the loaded configuration.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Lending limits and display settings from config.toml
    pub config: AppConfig,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection and configuration.
    #[must_use]
    pub const fn new(database: DatabaseConnection, config: AppConfig) -> Self {
        Self { database, config }
    }
}

/// Every command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::register(),
        commands::dashboard(),
        commands::credit_score(),
        commands::contribute(),
        commands::contributions(),
        commands::loan_eligibility(),
        commands::loan_quote(),
        commands::apply_loan(),
        commands::my_loans(),
        commands::loan_schedule(),
        commands::repay(),
        commands::insurance(),
        commands::subscribe_insurance(),
        commands::admin(),
    ]
}

/// Reports command failures back to the invoking user.
pub async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

pub use commands::*;
pub use handlers::*;
