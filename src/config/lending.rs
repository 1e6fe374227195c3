//! Application configuration loading from config.toml
//!
//! The `[lending]` table holds the request-validation limits applied before anything
//! reaches the scoring or loan engines. Every key has a default, and a missing file
//! means "use the defaults".

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Request-validation limits for contributions and loan applications
    #[serde(default)]
    pub lending: LendingConfig,
}

/// Limits applied to member input
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LendingConfig {
    /// Smallest accepted contribution
    pub min_contribution: Decimal,
    /// Smallest loan a member may apply for
    pub min_loan_amount: Decimal,
    /// Shortest loan term in months
    pub min_term_months: u32,
    /// Longest loan term in months
    pub max_term_months: u32,
    /// Shortest accepted loan purpose, in characters
    pub min_purpose_len: usize,
    /// Currency label used in messages
    pub currency: String,
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            min_contribution: dec!(100),
            min_loan_amount: dec!(1000),
            min_term_months: 6,
            max_term_months: 36,
            min_purpose_len: 5,
            currency: "KSh".to_string(),
        }
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads `./config.toml`, falling back to defaults when the file does not exist.
pub fn load_default_config() -> Result<AppConfig> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_config(path)
    } else {
        info!("No config.toml found, using default lending limits");
        Ok(AppConfig::default())
    }
}
