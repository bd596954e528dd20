//! Application configuration loaded from environment variables.
//!
//! Required: `DATABASE_URL`. Everything else has a default; `NATS_URL` is
//! optional and disables event publishing when absent.

use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub nats_url: Option<String>,
    pub currency: String,
    /// Delay before a pending sale is marked registered.
    pub sale_register_delay_secs: u64,
    /// Further delay before a registered sale is marked processing.
    pub sale_process_delay_secs: u64,
    pub scheduler_poll_secs: u64,
    pub cart_cookie_max_age_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parsed("PORT", "8083")?,
            nats_url: std::env::var("NATS_URL").ok(),
            currency: or_default("DEFAULT_CURRENCY", "USD"),
            sale_register_delay_secs: parsed("SALE_REGISTER_DELAY_SECS", "60")?,
            sale_process_delay_secs: parsed("SALE_PROCESS_DELAY_SECS", "300")?,
            scheduler_poll_secs: parsed("SCHEDULER_POLL_SECS", "5")?,
            cart_cookie_max_age_secs: parsed("CART_COOKIE_MAX_AGE_SECS", "3600")?,
        })
    }
}

fn required(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
