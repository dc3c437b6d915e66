//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::ledger::LedgerConfig;
use crate::repository::SyncConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerSettings,

    #[serde(default)]
    pub sync: SyncSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ledger gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_contract_address")]
    pub contract_address: String,

    /// Connected account address; absent when no wallet session exists
    pub account: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_endpoint() -> String {
    "http://localhost:8545".to_string()
}

fn default_contract_address() -> String {
    "0xcf13ec03df554cdf126e6e24b66a9ee46034dbf6".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            contract_address: default_contract_address(),
            account: None,
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl LedgerSettings {
    /// Build the gateway configuration
    pub fn to_ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            endpoint: self.endpoint.clone(),
            contract_address: self.contract_address.clone(),
            account: self.account.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Repository sync configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncSettings {
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u32,

    #[serde(default = "default_create_confirmation")]
    pub create_confirmation_ms: u64,

    #[serde(default = "default_donate_confirmation")]
    pub donate_confirmation_ms: u64,
}

fn default_token_decimals() -> u32 {
    18
}

fn default_create_confirmation() -> u64 {
    3_000
}

fn default_donate_confirmation() -> u64 {
    5_000
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            token_decimals: default_token_decimals(),
            create_confirmation_ms: default_create_confirmation(),
            donate_confirmation_ms: default_donate_confirmation(),
        }
    }
}

impl SyncSettings {
    /// Build the repository configuration
    pub fn to_sync_config(&self) -> SyncConfig {
        SyncConfig {
            token_decimals: self.token_decimals,
            create_confirmation_ms: self.create_confirmation_ms,
            donate_confirmation_ms: self.donate_confirmation_ms,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("fundsync").join("config.toml")),
            Some(PathBuf::from("/etc/fundsync/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var("FUNDSYNC_LEDGER_ENDPOINT") {
            self.ledger.endpoint = endpoint;
        }
        if let Ok(address) = std::env::var("FUNDSYNC_CONTRACT_ADDRESS") {
            self.ledger.contract_address = address;
        }
        if let Ok(account) = std::env::var("FUNDSYNC_ACCOUNT") {
            self.ledger.account = Some(account);
        }
        if let Ok(decimals) = std::env::var("FUNDSYNC_TOKEN_DECIMALS") {
            if let Ok(d) = decimals.parse() {
                self.sync.token_decimals = d;
            }
        }
        if let Ok(level) = std::env::var("FUNDSYNC_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FUNDSYNC_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger: LedgerSettings::default(),
            sync: SyncSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Fundsync Configuration
#
# Environment variables override these settings:
# - FUNDSYNC_LEDGER_ENDPOINT
# - FUNDSYNC_CONTRACT_ADDRESS
# - FUNDSYNC_ACCOUNT
# - FUNDSYNC_TOKEN_DECIMALS
# - FUNDSYNC_LOG_LEVEL
# - FUNDSYNC_LOG_FORMAT

[ledger]
# Contract relay base URL
endpoint = "http://localhost:8545"

# Crowdfunding contract address
contract_address = "0xcf13ec03df554cdf126e6e24b66a9ee46034dbf6"

# Connected account address (leave unset for read-only use)
# account = "0x..."

# Request timeout (ms)
request_timeout_ms = 10000

[sync]
# Decimal places of the ledger's token (18 for wei/ether)
token_decimals = 18

# Wait after a create submission before re-reading (ms)
create_confirmation_ms = 3000

# Wait after a donate submission before re-reading (ms)
donate_confirmation_ms = 5000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/fundsync/fundsync.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ledger.endpoint, "http://localhost:8545");
        assert_eq!(config.sync.token_decimals, 18);
        assert!(config.sync.donate_confirmation_ms > config.sync.create_confirmation_ms);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.ledger.contract_address, default_contract_address());
        assert!(config.ledger.account.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [ledger]
            endpoint = "http://relay.example:9000"
            account = "0xfeed"
            "#,
        )
        .unwrap();
        assert_eq!(config.ledger.endpoint, "http://relay.example:9000");
        assert_eq!(config.ledger.account.as_deref(), Some("0xfeed"));
        assert_eq!(config.sync.token_decimals, 18);
    }
}
