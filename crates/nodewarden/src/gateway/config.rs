// ============================================
// File: crates/nodewarden/src/gateway/config.rs
// ============================================
//! # Gateway Configuration

use serde::{Deserialize, Serialize};

/// Gateway API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// External IP lookup service URL.
    #[serde(default = "default_ip_service_url")]
    pub ip_service_url: String,

    /// HTTP request timeout in seconds.
    ///
    /// Applies to every gateway call. Deliberately generous because
    /// `start-session` can take far longer than the other calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Delay between keep-alive pings in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_secs: u64,
}

fn default_api_base_url() -> String {
    "https://gateway-run.bls.dev/api/v1".to_string()
}

fn default_ip_service_url() -> String {
    "https://tight-block-2413.txlabs.workers.dev".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_ping_interval() -> u64 {
    60
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            ip_service_url: default_ip_service_url(),
            request_timeout_secs: default_request_timeout(),
            ping_interval_secs: default_ping_interval(),
        }
    }
}

impl GatewayConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_base_url.is_empty() {
            return Err("api_base_url cannot be empty".to_string());
        }
        if self.ip_service_url.is_empty() {
            return Err("ip_service_url cannot be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be > 0".to_string());
        }
        if self.ping_interval_secs == 0 {
            return Err("ping_interval_secs must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_base_url, "https://gateway-run.bls.dev/api/v1");
        assert_eq!(config.ping_interval_secs, 60);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = GatewayConfig {
            ping_interval_secs: 0,
            ..GatewayConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
