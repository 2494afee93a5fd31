//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `MENTOM` prefix and nested values use double underscores
//! as separators.
//!
//! # Example
//!
//! ```no_run
//! use payment_mentom::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod gateway;
mod server;
mod webhook;

pub use error::{ConfigError, ValidationError};
pub use gateway::{GatewayConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use server::{Environment, ServerConfig};
pub use webhook::WebhookConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (webhook listener host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Gateway configuration (credentials, terminal, capture mode)
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Webhook verification configuration
    #[serde(default)]
    pub webhook: WebhookConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MENTOM` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MENTOM__GATEWAY__API_KEY=mk_live_...` -> `gateway.api_key = ...`
    /// - `MENTOM__GATEWAY__TERMINAL_ID=42` -> `gateway.terminal_id = 42`
    /// - `MENTOM__WEBHOOK__SECRET=...` -> `webhook.secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MENTOM")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.gateway.validate()?;
        self.webhook.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("MENTOM__GATEWAY__API_KEY", "mk_test_xxx");
        env::set_var("MENTOM__GATEWAY__TERMINAL_ID", "42");
    }

    fn clear_env() {
        env::remove_var("MENTOM__GATEWAY__API_KEY");
        env::remove_var("MENTOM__GATEWAY__TERMINAL_ID");
        env::remove_var("MENTOM__GATEWAY__CAPTURE");
        env::remove_var("MENTOM__GATEWAY__BASE_URL");
        env::remove_var("MENTOM__WEBHOOK__SECRET");
        env::remove_var("MENTOM__SERVER__PORT");
        env::remove_var("MENTOM__SERVER__ENVIRONMENT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.gateway.api_key, "mk_test_xxx");
        assert_eq!(config.gateway.terminal_id, 42);
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok());
        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sandbox_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var(
            "MENTOM__GATEWAY__BASE_URL",
            "https://sandbox.mentomdashboard.com",
        );
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.gateway.is_sandbox());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("MENTOM__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_webhook_secret_optional() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.webhook.secret.is_none());
        assert!(!config.webhook.is_enforcing());
    }
}
