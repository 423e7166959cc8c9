// ============================================
// File: crates/nodewarden-common/src/error.rs
// ============================================
//! # Common Error Types
//!
//! ## Creation Reason
//! Defines parse-level errors for the shared domain types so that input
//! loading can report exactly which token of which credential file was
//! rejected.
//!
//! ## Main Functionality
//! - `CommonError`: Primary error enum for domain type construction
//! - `Result`: Convenience alias
//!
//! ## ⚠️ Important Note for Next Developer
//! - Error messages may be printed to operators; never embed full
//!   credentials in them (proxy passwords, bearer tokens)
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

/// Result type for common operations.
pub type Result<T> = std::result::Result<T, CommonError>;

/// Errors produced while constructing domain types from raw input tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// A node identity line did not have the `nodeId:hardwareId` shape.
    #[error("Invalid node identity '{line}': expected 'nodeId:hardwareId'")]
    InvalidNodeIdentity {
        /// The offending input line.
        line: String,
    },

    /// A proxy endpoint token could not be parsed.
    #[error("Invalid proxy endpoint '{token}': {reason}")]
    InvalidProxyEndpoint {
        /// The offending token (credentials stripped by the caller).
        token: String,
        /// Why parsing failed.
        reason: String,
    },

    /// An account line was empty after trimming.
    #[error("Account token cannot be empty")]
    EmptyAccountToken,
}

impl CommonError {
    /// Creates an `InvalidProxyEndpoint` error.
    pub fn invalid_proxy(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProxyEndpoint {
            token: token.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CommonError::InvalidNodeIdentity {
            line: "no-separator".to_string(),
        };
        assert!(err.to_string().contains("no-separator"));
    }

    #[test]
    fn test_proxy_error_helper() {
        let err = CommonError::invalid_proxy("host", "missing port");
        assert!(err.to_string().contains("missing port"));
    }
}
