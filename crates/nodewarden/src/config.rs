// ============================================
// File: crates/nodewarden/src/config.rs
// ============================================
//! # Keeper Configuration
//!
//! ## Creation Reason
//! Provides configuration management for the NodeWarden keeper,
//! supporting TOML files with sensible defaults for every field.
//!
//! ## Main Functionality
//! - `WardenConfig`: Main configuration structure
//! - TOML file loading and parsing
//! - Configuration validation
//!
//! ## Configuration Sections
//! - `gateway`: API base URL, IP service URL, timeout, ping interval
//! - `inputs`: paths of the three credential files
//! - `logging`: log level
//!
//! ## Example Configuration
//! ```toml
//! [gateway]
//! api_base_url = "https://gateway-run.bls.dev/api/v1"
//! ip_service_url = "https://tight-block-2413.txlabs.workers.dev"
//! request_timeout_secs = 120
//! ping_interval_secs = 60
//!
//! [inputs]
//! accounts_file = "user.txt"
//! nodes_file = "id.txt"
//! proxies_file = "proxy.txt"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - A missing config file is fine: every field has a default, and the
//!   defaults reproduce the classic user.txt / id.txt / proxy.txt layout
//! - Config changes require a restart
//!
//! ## Last Modified
//! v0.1.0 - Initial configuration implementation

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, WardenError};
use crate::gateway::GatewayConfig;

// ============================================
// WardenConfig
// ============================================

/// Main keeper configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Gateway API configuration.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Input file locations.
    #[serde(default)]
    pub inputs: InputsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WardenConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, or fails
    /// validation.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        info!("Loading configuration from: {}", path_str);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| WardenError::config_load(&path_str, e.to_string()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| WardenError::config_load(&path_str, e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a string (useful for testing).
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| WardenError::config_load("<string>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.gateway
            .validate()
            .map_err(|e| WardenError::config_invalid("gateway", e))?;
        self.inputs.validate()?;
        Ok(())
    }
}

// ============================================
// InputsConfig
// ============================================

/// Input file locations section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    /// Accounts file: one bearer token per line.
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,

    /// Node list file: one `nodeId:hardwareId` per line.
    #[serde(default = "default_nodes_file")]
    pub nodes_file: String,

    /// Proxy list file: one `host:port[:user:pass]` per line.
    #[serde(default = "default_proxies_file")]
    pub proxies_file: String,
}

fn default_accounts_file() -> String {
    "user.txt".to_string()
}

fn default_nodes_file() -> String {
    "id.txt".to_string()
}

fn default_proxies_file() -> String {
    "proxy.txt".to_string()
}

impl InputsConfig {
    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("inputs.accounts_file", &self.accounts_file),
            ("inputs.nodes_file", &self.nodes_file),
            ("inputs.proxies_file", &self.proxies_file),
        ] {
            if value.is_empty() {
                return Err(WardenError::config_invalid(field, "cannot be empty"));
            }
        }
        Ok(())
    }
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            accounts_file: default_accounts_file(),
            nodes_file: default_nodes_file(),
            proxies_file: default_proxies_file(),
        }
    }
}

// ============================================
// LoggingConfig
// ============================================

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================
// Tests
// ============================================
