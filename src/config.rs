//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::lookup::{ExpiryMode, LookupSettings, DEFAULT_CIRCUIT_WINDOW};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Primary provider attempts per lookup
    pub retry_count: u32,
    /// Pause between primary provider attempts
    pub retry_delay: Duration,
    /// Primary failures tolerated within the circuit window
    pub error_threshold: usize,
    /// Lifetime of cached advertisements
    pub cache_lead_time: Duration,
    pub cache_expiry_mode: ExpiryMode,
    /// Base URL of the primary (HTTP) provider
    pub primary_url: String,
    /// Per-request timeout for the primary provider
    pub primary_timeout: Duration,
    /// JSON catalogue backing the secondary provider
    pub catalog_path: String,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `RETRY_COUNT` - Primary attempts per lookup (default: 3)
    /// - `RETRY_DELAY_MS` - Pause between attempts in ms (default: 1000)
    /// - `ERROR_THRESHOLD` - Failures per hour before the circuit opens (default: 10)
    /// - `CACHE_LEAD_TIME_SECS` - Cache lifetime in seconds (default: 300)
    /// - `CACHE_EXPIRY_MODE` - `fixed` or `sliding` (default: fixed)
    /// - `PRIMARY_URL` - Primary provider base URL (default: http://127.0.0.1:8081)
    /// - `PRIMARY_TIMEOUT_MS` - Primary request timeout in ms (default: 1000)
    /// - `CATALOG_PATH` - Secondary catalogue file (default: catalog.json)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            retry_count: env_or("RETRY_COUNT", defaults.retry_count),
            retry_delay: Duration::from_millis(env_or(
                "RETRY_DELAY_MS",
                defaults.retry_delay.as_millis() as u64,
            )),
            error_threshold: env_or("ERROR_THRESHOLD", defaults.error_threshold),
            cache_lead_time: Duration::from_secs(env_or(
                "CACHE_LEAD_TIME_SECS",
                defaults.cache_lead_time.as_secs(),
            )),
            cache_expiry_mode: env_or("CACHE_EXPIRY_MODE", defaults.cache_expiry_mode),
            primary_url: env_or("PRIMARY_URL", defaults.primary_url),
            primary_timeout: Duration::from_millis(env_or(
                "PRIMARY_TIMEOUT_MS",
                defaults.primary_timeout.as_millis() as u64,
            )),
            catalog_path: env_or("CATALOG_PATH", defaults.catalog_path),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// Orchestrator settings derived from this configuration.
    pub fn lookup_settings(&self) -> LookupSettings {
        LookupSettings {
            retry_count: self.retry_count,
            retry_delay: self.retry_delay,
            error_threshold: self.error_threshold,
            cache_lead_time: self.cache_lead_time,
            circuit_window: DEFAULT_CIRCUIT_WINDOW,
            expiry_mode: self.cache_expiry_mode,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retry_count: 3,
            retry_delay: Duration::from_millis(1000),
            error_threshold: 10,
            cache_lead_time: Duration::from_secs(300),
            cache_expiry_mode: ExpiryMode::FixedAtStartup,
            primary_url: "http://127.0.0.1:8081".to_string(),
            primary_timeout: Duration::from_millis(1000),
            catalog_path: "catalog.json".to_string(),
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.retry_count, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert_eq!(config.error_threshold, 10);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 60);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "RETRY_COUNT",
            "RETRY_DELAY_MS",
            "ERROR_THRESHOLD",
            "CACHE_LEAD_TIME_SECS",
            "CACHE_EXPIRY_MODE",
            "PRIMARY_URL",
            "PRIMARY_TIMEOUT_MS",
            "CATALOG_PATH",
            "SERVER_PORT",
            "CLEANUP_INTERVAL",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.retry_count, 3);
        assert_eq!(config.cache_lead_time, Duration::from_secs(300));
        assert_eq!(config.cache_expiry_mode, ExpiryMode::FixedAtStartup);
        assert_eq!(config.primary_url, "http://127.0.0.1:8081");
        assert_eq!(config.catalog_path, "catalog.json");
    }

    #[test]
    fn test_lookup_settings_carry_config() {
        let config = Config {
            retry_count: 5,
            error_threshold: 2,
            cache_expiry_mode: ExpiryMode::Sliding,
            ..Config::default()
        };

        let settings = config.lookup_settings();
        assert_eq!(settings.retry_count, 5);
        assert_eq!(settings.error_threshold, 2);
        assert_eq!(settings.expiry_mode, ExpiryMode::Sliding);
        assert_eq!(settings.circuit_window, Duration::from_secs(3600));
    }
}
