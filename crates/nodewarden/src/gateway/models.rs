// ============================================
// File: crates/nodewarden/src/gateway/models.rs
// ============================================
//! # Gateway Wire Models
//!
//! ## Creation Reason
//! Request and response shapes for the four gateway operations. The
//! registration and session responses are opaque JSON objects: the caller
//! only ever logs them, so they stay untyped.
//!
//! ## Last Modified
//! v0.1.0 - Initial wire models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the node registration request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// External IP address observed through the node's proxy.
    pub ip_address: String,
    /// The node's hardware identifier.
    pub hardware_id: String,
}

/// Opaque registration response, kept only for logging.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct RegistrationResult(
    /// Raw response object.
    pub Value,
);

/// Opaque start-session response, kept only for logging.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SessionResult(
    /// Raw response object.
    pub Value,
);

/// Parsed ping response.
#[derive(Debug, Clone, Deserialize)]
pub struct PingResult {
    /// Health indicator; the literal `"ok"` means healthy.
    pub status: String,
    /// Everything else the gateway sent along.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl PingResult {
    /// Returns `true` when the gateway reported a healthy ping.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_uses_camel_case() {
        let request = RegisterRequest {
            ip_address: "198.51.100.9".to_string(),
            hardware_id: "hw-1".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["ipAddress"], "198.51.100.9");
        assert_eq!(json["hardwareId"], "hw-1");
    }

    #[test]
    fn test_ping_result_status() {
        let ok: PingResult = serde_json::from_str(r#"{"status":"ok","extraField":1}"#).unwrap();
        assert!(ok.is_ok());
        assert_eq!(ok.extra["extraField"], 1);

        let draining: PingResult = serde_json::from_str(r#"{"status":"draining"}"#).unwrap();
        assert!(!draining.is_ok());
    }
}
