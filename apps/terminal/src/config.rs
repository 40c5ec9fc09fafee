//! # Terminal Configuration
//!
//! Configuration for the cashier terminal binary.
//!
//! ## Configuration Sources
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  Configuration Priority                      │
//! │                                                              │
//! │  1. Environment Variables (highest priority)                 │
//! │     WARUNG_API_URL=https://api.example.com/api               │
//! │     WARUNG_API_TOKEN=eyJhbGciOi...                           │
//! │                                                              │
//! │  2. TOML Config File                                         │
//! │     ~/.config/warung-pos/terminal.toml (Linux)               │
//! │                                                              │
//! │  3. Default Values (lowest priority)                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # terminal.toml
//! [api]
//! base_url = "http://localhost:8000/api"
//! token = "eyJhbGciOi..."
//!
//! [terminal]
//! customer_type = "dine-in"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Terminal configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// API Settings
// =============================================================================

/// Connection settings for the REST backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the backend API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// JWT bearer token issued at login.
    #[serde(default)]
    pub token: String,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            token: String::new(),
        }
    }
}

// =============================================================================
// Terminal Settings
// =============================================================================

/// Terminal behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalSettings {
    /// Sales channel preselected when a new order starts.
    #[serde(default = "default_customer_type")]
    pub customer_type: String,
}

fn default_customer_type() -> String {
    "dine-in".to_string()
}

impl Default for TerminalSettings {
    fn default() -> Self {
        TerminalSettings {
            customer_type: default_customer_type(),
        }
    }
}

// =============================================================================
// Main Terminal Configuration
// =============================================================================

/// Complete terminal configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Backend connection settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Terminal behavior settings.
    #[serde(default)]
    pub terminal: TerminalSettings,
}

impl TerminalConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (terminal.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading terminal config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "API base URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.token.is_empty() {
            return Err(ConfigError::Invalid(
                "No API token configured. Set WARUNG_API_TOKEN or add it to terminal.toml".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("WARUNG_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(token) = std::env::var("WARUNG_API_TOKEN") {
            debug!("Overriding API token from environment");
            self.api.token = token;
        }

        if let Ok(channel) = std::env::var("WARUNG_CUSTOMER_TYPE") {
            self.terminal.customer_type = channel;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("id", "warung", "pos")
            .map(|dirs| dirs.config_dir().join("terminal.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_fails_validation_without_token() {
        let config = TerminalConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_scheme_rejected() {
        let mut config = TerminalConfig::default();
        config.api.token = "t".to_string();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://example.com/api".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
            [api]
            base_url = "http://10.0.0.5:8000/api"
            token = "abc"

            [terminal]
            customer_type = "gofood"
        "#;

        let config: TerminalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000/api");
        assert_eq!(config.terminal.customer_type, "gofood");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: TerminalConfig = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, default_base_url());
        assert_eq!(config.terminal.customer_type, "dine-in");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: TerminalConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://from-file:8000/api"
            token = "file-token"
        "#,
        )
        .unwrap();

        std::env::set_var("WARUNG_API_URL", "https://from-env/api");
        std::env::set_var("WARUNG_API_TOKEN", "env-token");
        config.apply_env_overrides();
        std::env::remove_var("WARUNG_API_URL");
        std::env::remove_var("WARUNG_API_TOKEN");

        assert_eq!(config.api.base_url, "https://from-env/api");
        assert_eq!(config.api.token, "env-token");
        // The file value survives where no variable is set
        assert_eq!(config.terminal.customer_type, "dine-in");
    }
}
