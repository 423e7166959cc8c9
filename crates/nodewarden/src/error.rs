// ============================================
// File: crates/nodewarden/src/error.rs
// ============================================
//! # Keeper Error Types
//!
//! ## Creation Reason
//! Defines the error taxonomy for the whole keeper: gateway call failures,
//! configuration problems, input file problems, and the startup
//! cardinality check.
//!
//! ## Error Categories
//! 1. **Network**: transport-level failures (DNS, connect, timeout)
//! 2. **Protocol**: malformed or unexpected response shapes
//! 3. **Auth**: credential rejected (401/403)
//! 4. **Api**: any other non-2xx response
//! 5. **Config/Input**: startup file problems
//!
//! ## ⚠️ Important Note for Next Developer
//! - Worker-side errors are terminal for that worker only; they are logged
//!   at the worker boundary and never re-raised to the orchestrator
//! - `CardinalityMismatch` is the one startup precondition that aborts the
//!   entire run before any network activity
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use nodewarden_common::error::CommonError;

/// Result type for keeper operations.
pub type Result<T> = std::result::Result<T, WardenError>;

/// Keeper error types.
#[derive(Error, Debug)]
pub enum WardenError {
    // ========================================
    // Gateway Errors
    // ========================================

    /// Transport-level failure (DNS, connect, timeout, TLS).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The external IP lookup service answered with a non-2xx status.
    ///
    /// Classified as a network-class failure: the lookup either works or
    /// the route through the proxy is unusable.
    #[error("IP lookup service returned status {status}")]
    IpLookup {
        /// HTTP status code returned by the IP service.
        status: u16,
    },

    /// Response body was malformed or missing an expected field.
    #[error("Protocol error: {reason}")]
    Protocol {
        /// What was wrong with the response.
        reason: String,
    },

    /// Credential rejected by the gateway (401 or 403).
    #[error("Authentication rejected (status {status})")]
    Auth {
        /// The rejecting HTTP status code.
        status: u16,
    },

    /// Any other non-2xx gateway response.
    #[error("Gateway API error (status {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, for operator diagnosis.
        body: String,
    },

    // ========================================
    // Startup Errors
    // ========================================

    /// Failed to read or parse the configuration file.
    #[error("Failed to load configuration from '{path}': {reason}")]
    ConfigLoad {
        /// Configuration file path.
        path: String,
        /// Why loading failed.
        reason: String,
    },

    /// A configuration field failed validation.
    #[error("Invalid configuration: {field} - {reason}")]
    ConfigInvalid {
        /// Dotted field path.
        field: String,
        /// Why validation failed.
        reason: String,
    },

    /// Failed to read one of the credential input files.
    #[error("Failed to load input file '{path}': {reason}")]
    InputLoad {
        /// Input file path.
        path: String,
        /// Why loading failed.
        reason: String,
    },

    /// The 1 account : 5 nodes : 5 proxies invariant does not hold.
    #[error(
        "Cardinality mismatch: every account needs exactly 5 nodes and 5 proxies, \
         got {accounts} account(s), {nodes} node(s), {proxies} proxy(ies)"
    )]
    CardinalityMismatch {
        /// Number of loaded accounts.
        accounts: usize,
        /// Number of loaded node identities.
        nodes: usize,
        /// Number of loaded proxy endpoints.
        proxies: usize,
    },

    /// Domain type construction failed.
    #[error(transparent)]
    Common(#[from] CommonError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WardenError {
    /// Creates a `Protocol` error.
    pub fn protocol(reason: impl Into<String>) -> Self {
        Self::Protocol { reason: reason.into() }
    }

    /// Creates a `ConfigLoad` error.
    pub fn config_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `ConfigInvalid` error.
    pub fn config_invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `InputLoad` error.
    pub fn input_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InputLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Maps a non-2xx gateway status to the matching error variant.
    ///
    /// 401 and 403 become [`WardenError::Auth`]; everything else becomes
    /// [`WardenError::Api`] carrying the response body.
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Auth { status },
            _ => Self::Api { status, body },
        }
    }

    /// Returns `true` for transport-class failures.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::IpLookup { .. })
    }

    /// Returns `true` when a credential was rejected.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Returns `true` for configuration problems.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigLoad { .. } | Self::ConfigInvalid { .. })
    }

    /// Returns `true` for errors that abort the whole run at startup.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigLoad { .. }
                | Self::ConfigInvalid { .. }
                | Self::InputLoad { .. }
                | Self::CardinalityMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            WardenError::from_status(401, String::new()),
            WardenError::Auth { status: 401 }
        ));
        assert!(matches!(
            WardenError::from_status(403, String::new()),
            WardenError::Auth { status: 403 }
        ));
        assert!(matches!(
            WardenError::from_status(500, String::new()),
            WardenError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_classification() {
        assert!(WardenError::IpLookup { status: 502 }.is_network());
        assert!(WardenError::Auth { status: 401 }.is_auth());
        assert!(!WardenError::Auth { status: 401 }.is_fatal());

        let mismatch = WardenError::CardinalityMismatch {
            accounts: 1,
            nodes: 4,
            proxies: 5,
        };
        assert!(mismatch.is_fatal());
    }

    #[test]
    fn test_cardinality_message_lists_counts() {
        let err = WardenError::CardinalityMismatch {
            accounts: 2,
            nodes: 9,
            proxies: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("2 account(s)"));
        assert!(msg.contains("9 node(s)"));
        assert!(msg.contains("10 proxy(ies)"));
    }

    #[test]
    fn test_config_error_display() {
        let err = WardenError::config_load("/etc/nodewarden.toml", "file not found");
        assert!(err.to_string().contains("/etc/nodewarden.toml"));
        assert!(err.is_config_error());
    }
}
