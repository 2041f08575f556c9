//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Variables
//!
//! - `DATABASE_URL` - SQLite database (default: `sqlite://shortener.db`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `PUBLIC_URL` - Origin used when a request has no `Host` (default: `http://localhost:3000`)
//! - `BEHIND_PROXY` - Trust `X-Forwarded-Proto` / `X-Forwarded-Host` (default: `false`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `SHORT_CODE_LENGTH` - Generated code length, 4 to 32 (default: 6)
//! - `CODE_MAX_ATTEMPTS` - Insert attempts per shorten request, 1 to 64 (default: 8)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `DB_CONNECT_TIMEOUT` - Pool acquire timeout in seconds (default: 30)
//!
//! A `.env` file in the working directory is honoured when the binaries call
//! `dotenvy::dotenv()` before [`load_from_env`].

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::application::services::DEFAULT_MAX_ATTEMPTS;
use crate::infrastructure::persistence::PoolSettings;
use crate::utils::code_generator::DEFAULT_CODE_LENGTH;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://shortener.db";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub public_url: String,
    /// When true, the request origin is read from `X-Forwarded-*` headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
    pub log_level: String,
    pub log_format: String,
    pub short_code_length: usize,
    pub code_max_attempts: usize,

    // ── SqlitePool settings ─────────────────────────────────────────────────
    /// Maximum number of connections in the pool (`DB_MAX_CONNECTIONS`, default: 10).
    pub db_max_connections: u32,
    /// Timeout for acquiring a connection from the pool in seconds
    /// (`DB_CONNECT_TIMEOUT`, default: 30).
    pub db_connect_timeout: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Unset variables take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but does not parse.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());
        let public_url = env::var("PUBLIC_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_URL.to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            listen_addr,
            public_url,
            behind_proxy,
            log_level,
            log_format,
            short_code_length: parse_var("SHORT_CODE_LENGTH", DEFAULT_CODE_LENGTH)?,
            code_max_attempts: parse_var("CODE_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
            db_connect_timeout: parse_var("DB_CONNECT_TIMEOUT", 30)?,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - `database_url` is not a `sqlite:` URL
    /// - `public_url` is not an http(s) origin
    /// - code length, attempt budget or pool settings are out of range
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if !self.public_url.starts_with("http://") && !self.public_url.starts_with("https://") {
            anyhow::bail!(
                "PUBLIC_URL must start with 'http://' or 'https://', got '{}'",
                self.public_url
            );
        }

        if !(4..=32).contains(&self.short_code_length) {
            anyhow::bail!(
                "SHORT_CODE_LENGTH must be between 4 and 32, got {}",
                self.short_code_length
            );
        }

        if !(1..=64).contains(&self.code_max_attempts) {
            anyhow::bail!(
                "CODE_MAX_ATTEMPTS must be between 1 and 64, got {}",
                self.code_max_attempts
            );
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Pool settings derived from the `DB_*` variables.
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(self.db_connect_timeout),
        }
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!("  Public URL: {}", self.public_url);
        tracing::info!("  Behind proxy: {}", self.behind_proxy);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!(
            "  Short codes: {} chars, {} attempts",
            self.short_code_length,
            self.code_max_attempts
        );
    }
}

/// Reads `name`, falling back to `default` when it is unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable does not parse or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "DATABASE_URL",
        "LISTEN",
        "PUBLIC_URL",
        "BEHIND_PROXY",
        "LOG_FORMAT",
        "SHORT_CODE_LENGTH",
        "CODE_MAX_ATTEMPTS",
        "DB_MAX_CONNECTIONS",
        "DB_CONNECT_TIMEOUT",
    ];

    fn clear_vars() {
        // SAFETY: callers are #[serial], so no concurrent env access
        unsafe {
            for var in VARS {
                env::remove_var(var);
            }
        }
    }

    fn valid_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            listen_addr: "0.0.0.0:3000".to_string(),
            public_url: "http://localhost:3000".to_string(),
            behind_proxy: false,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            short_code_length: 6,
            code_max_attempts: 8,
            db_max_connections: 10,
            db_connect_timeout: 30,
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());

        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());

        config.listen_addr = "0.0.0.0:3000".to_string();

        config.database_url = "postgres://localhost/test".to_string();
        assert!(config.validate().is_err());

        config.database_url = "sqlite://shortener.db".to_string();

        config.public_url = "s.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_ranges() {
        let mut config = valid_config();

        config.short_code_length = 3;
        assert!(config.validate().is_err());
        config.short_code_length = 33;
        assert!(config.validate().is_err());
        config.short_code_length = 32;
        assert!(config.validate().is_ok());

        config.code_max_attempts = 0;
        assert!(config.validate().is_err());
        config.code_max_attempts = 65;
        assert!(config.validate().is_err());
        config.code_max_attempts = 1;
        assert!(config.validate().is_ok());

        config.db_max_connections = 0;
        assert!(config.validate().is_err());
        config.db_max_connections = 1;

        config.db_connect_timeout = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pool_settings() {
        let mut config = valid_config();
        config.db_max_connections = 4;
        config.db_connect_timeout = 5;

        let settings = config.pool_settings();
        assert_eq!(settings.max_connections, 4);
        assert_eq!(settings.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    #[serial]
    fn test_defaults_when_unset() {
        clear_vars();

        let config = load_from_env().unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.public_url, DEFAULT_PUBLIC_URL);
        assert!(!config.behind_proxy);
        assert_eq!(config.log_format, "text");
        assert_eq!(config.short_code_length, DEFAULT_CODE_LENGTH);
        assert_eq!(config.code_max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.db_connect_timeout, 30);
    }

    #[test]
    #[serial]
    fn test_values_from_env() {
        clear_vars();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("DATABASE_URL", "sqlite://data/links.db");
            env::set_var("PUBLIC_URL", "https://s.example.com");
            env::set_var("BEHIND_PROXY", "TRUE");
            env::set_var("SHORT_CODE_LENGTH", "8");
            env::set_var("CODE_MAX_ATTEMPTS", " 16 ");
        }

        let config = load_from_env().unwrap();

        assert_eq!(config.database_url, "sqlite://data/links.db");
        assert_eq!(config.public_url, "https://s.example.com");
        assert!(config.behind_proxy);
        assert_eq!(config.short_code_length, 8);
        assert_eq!(config.code_max_attempts, 16);

        clear_vars();
    }

    #[test]
    #[serial]
    fn test_unparsable_number_is_an_error() {
        clear_vars();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("SHORT_CODE_LENGTH", "six");
        }

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("SHORT_CODE_LENGTH"));

        clear_vars();
    }

    #[test]
    #[serial]
    fn test_out_of_range_value_fails_validation() {
        clear_vars();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("CODE_MAX_ATTEMPTS", "0");
        }

        assert!(load_from_env().is_err());

        clear_vars();
    }
}
