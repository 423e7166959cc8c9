// ============================================
// File: crates/nodewarden-common/src/types.rs
// ============================================
//! # Core Type Definitions
//!
//! ## Creation Reason
//! Centralizes the domain vocabulary of the NodeWarden keeper: accounts,
//! node identities, proxy endpoints, and the per-worker session state,
//! ensuring consistent parsing and safe (redacted) debug output.
//!
//! ## Main Functionality
//! - `Account`: Opaque bearer credential, cheaply cloneable, shared
//!   read-only by the workers of one account
//! - `NodeIdentity`: (nodeId, hardwareId) pair, one per worker
//! - `ProxyEndpoint`: host:port with optional credentials, one per worker
//! - `WorkerAssignment`: the (account, node, proxy) tuple bound at spawn
//! - `SessionState`: lifecycle states of a session worker
//!
//! ## Main Logical Flow
//! 1. Types are parsed from line-oriented credential files at startup
//! 2. The orchestrator zips them into `WorkerAssignment`s
//! 3. Each worker holds its assignment immutably for its whole life
//!
//! ## ⚠️ Important Note for Next Developer
//! - `Account` and `ProxyAuth` are security-sensitive - their `Debug`
//!   impls redact the secret; keep it that way
//! - `Account` wraps `Arc<str>` so five workers share one allocation
//! - Parsing is intentionally forgiving about extra colons in hardware IDs
//!
//! ## Last Modified
//! v0.1.0 - Initial type definitions

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::CommonError;

// ============================================
// Constants
// ============================================

/// Number of nodes (and proxies) served by a single account.
pub const NODES_PER_ACCOUNT: usize = 5;

// ============================================
// Account
// ============================================

/// Opaque bearer credential authorizing operations on up to
/// [`NODES_PER_ACCOUNT`] nodes.
///
/// # Sharing Model
/// Loaded once at startup and handed to each of its workers as a cheap
/// `Arc`-backed clone. Workers never mutate it.
///
/// # Example
/// ```
/// use nodewarden_common::types::Account;
///
/// let account = Account::new("eyJhbGciOi...").unwrap();
/// assert_eq!(account.token(), "eyJhbGciOi...");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Account(Arc<str>);

impl Account {
    /// Creates an account from a bearer token.
    ///
    /// # Errors
    /// Returns [`CommonError::EmptyAccountToken`] if the trimmed token is
    /// empty.
    pub fn new(token: impl AsRef<str>) -> Result<Self, CommonError> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            return Err(CommonError::EmptyAccountToken);
        }
        Ok(Self(Arc::from(token)))
    }

    /// Returns the raw bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only show a short prefix so tokens never land in logs
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "Account({prefix}…)")
    }
}

// ============================================
// NodeIdentity
// ============================================

/// Identity of one remote node: the pair (nodeId, hardwareId).
///
/// # Wire Format
/// One line of the node list file: `nodeId:hardwareId`. The split happens
/// on the first colon, so hardware IDs may themselves contain colons.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeIdentity {
    /// Node identifier used in API paths.
    pub node_id: String,
    /// Hardware identifier reported at registration.
    pub hardware_id: String,
}

impl NodeIdentity {
    /// Creates a node identity from its two parts.
    ///
    /// # Errors
    /// Returns [`CommonError::InvalidNodeIdentity`] if either part is empty.
    pub fn new(node_id: impl Into<String>, hardware_id: impl Into<String>) -> Result<Self, CommonError> {
        let node_id = node_id.into();
        let hardware_id = hardware_id.into();
        if node_id.is_empty() || hardware_id.is_empty() {
            return Err(CommonError::InvalidNodeIdentity {
                line: format!("{node_id}:{hardware_id}"),
            });
        }
        Ok(Self { node_id, hardware_id })
    }
}

impl FromStr for NodeIdentity {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (node_id, hardware_id) = line.split_once(':').ok_or_else(|| {
            CommonError::InvalidNodeIdentity { line: line.to_string() }
        })?;
        Self::new(node_id, hardware_id)
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node_id)
    }
}

// ============================================
// ProxyAuth
// ============================================

/// Optional credentials for an authenticated proxy.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProxyAuth {
    /// Proxy username.
    pub username: String,
    /// Proxy password.
    pub password: String,
}

impl fmt::Debug for ProxyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyAuth")
            .field("username", &self.username)
            .field("password", &"…")
            .finish()
    }
}

// ============================================
// ProxyEndpoint
// ============================================

/// Outbound proxy through which all of one node's traffic is tunneled.
///
/// # Wire Format
/// One line of the proxy list file, either `host:port` or
/// `host:port:user:pass`.
///
/// # Routing
/// Each worker builds two proxy routes (plain HTTP and HTTPS) that both
/// point at [`ProxyEndpoint::url`]. Proxies are dedicated: one endpoint
/// serves exactly one node and is never pooled across workers.
///
/// # Example
/// ```
/// use nodewarden_common::types::ProxyEndpoint;
///
/// let proxy: ProxyEndpoint = "10.0.0.1:8080".parse().unwrap();
/// assert_eq!(proxy.url(), "http://10.0.0.1:8080");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyEndpoint {
    /// Proxy host (name or address).
    pub host: String,
    /// Proxy port.
    pub port: u16,
    /// Optional basic-auth credentials.
    pub auth: Option<ProxyAuth>,
}

impl ProxyEndpoint {
    /// Returns the proxy URL, always with the `http` scheme.
    ///
    /// Both the HTTP and HTTPS routes of a worker's client use this same
    /// URL; the proxy itself tunnels TLS via CONNECT.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl FromStr for ProxyEndpoint {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let parts: Vec<&str> = token.split(':').collect();

        let (host, port_str, auth) = match parts.as_slice() {
            [host, port] => (*host, *port, None),
            [host, port, user, pass] => (
                *host,
                *port,
                Some(ProxyAuth {
                    username: (*user).to_string(),
                    password: (*pass).to_string(),
                }),
            ),
            _ => {
                return Err(CommonError::invalid_proxy(
                    redact_proxy_token(token),
                    "expected 'host:port' or 'host:port:user:pass'",
                ));
            }
        };

        if host.is_empty() {
            return Err(CommonError::invalid_proxy(
                redact_proxy_token(token),
                "host cannot be empty",
            ));
        }

        let port: u16 = port_str.parse().map_err(|_| {
            CommonError::invalid_proxy(redact_proxy_token(token), "invalid port")
        })?;
        if port == 0 {
            return Err(CommonError::invalid_proxy(
                redact_proxy_token(token),
                "port cannot be 0",
            ));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            auth,
        })
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Strips everything past `host:port` so error messages never carry
/// proxy passwords.
fn redact_proxy_token(token: &str) -> String {
    let mut it = token.splitn(3, ':');
    match (it.next(), it.next()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        _ => token.to_string(),
    }
}

// ============================================
// WorkerAssignment
// ============================================

/// The unit of work: one (account, node, proxy) triple bound at spawn time.
///
/// # Invariant
/// Assignment `index` maps to account `index / NODES_PER_ACCOUNT` and to
/// node and proxy `index` of their respective lists.
#[derive(Debug, Clone)]
pub struct WorkerAssignment {
    /// Position of this assignment in the fan-out (0-based).
    pub index: usize,
    /// Shared read-only account credential.
    pub account: Account,
    /// The node this worker keeps alive.
    pub node: NodeIdentity,
    /// The dedicated proxy for this node's traffic.
    pub proxy: ProxyEndpoint,
}

// ============================================
// SessionState
// ============================================

/// Lifecycle states of a session worker.
///
/// ```text
/// Unregistered ──► Registered ──► SessionActive ──► Pinging ──┐
///       │               │                │            ▲  │    │
///       │               │                │            └──┘    │
///       ▼               ▼                ▼      (loops)       ▼
///     Failed ◄──────────┴────────────────┴──────────────── Failed
///
/// Stopped: reached from any state when the shutdown signal fires.
/// ```
///
/// `Failed` and `Stopped` are terminal for the owning worker only; they
/// never propagate to sibling workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Initial state, before registration.
    Unregistered,
    /// Node registered with the gateway.
    Registered,
    /// Server-side session started.
    SessionActive,
    /// Keep-alive ping loop (no natural terminus).
    Pinging,
    /// Terminal: an unrecoverable error ended this worker.
    Failed,
    /// Terminal: the shutdown signal ended this worker.
    Stopped,
}

impl SessionState {
    /// Returns `true` for states a worker can never leave.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Stopped)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unregistered => "unregistered",
            Self::Registered => "registered",
            Self::SessionActive => "session-active",
            Self::Pinging => "pinging",
            Self::Failed => "failed",
            Self::Stopped => "stopped",
        };
        write!(f, "{name}")
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_rejects_empty() {
        assert!(Account::new("").is_err());
        assert!(Account::new("   ").is_err());
    }

    #[test]
    fn test_account_debug_redacts_token() {
        let account = Account::new("super-secret-bearer-token").unwrap();
        let debug = format!("{account:?}");
        assert!(!debug.contains("secret-bearer"));
        assert!(debug.starts_with("Account(super-"));
    }

    #[test]
    fn test_node_identity_parse() {
        let node: NodeIdentity = "12D3KooW:0123abcd".parse().unwrap();
        assert_eq!(node.node_id, "12D3KooW");
        assert_eq!(node.hardware_id, "0123abcd");
    }

    #[test]
    fn test_node_identity_splits_on_first_colon() {
        let node: NodeIdentity = "node-1:hw:with:colons".parse().unwrap();
        assert_eq!(node.node_id, "node-1");
        assert_eq!(node.hardware_id, "hw:with:colons");
    }

    #[test]
    fn test_node_identity_rejects_missing_separator() {
        assert!("just-a-node-id".parse::<NodeIdentity>().is_err());
        assert!(":hw".parse::<NodeIdentity>().is_err());
        assert!("node:".parse::<NodeIdentity>().is_err());
    }

    #[test]
    fn test_proxy_parse_plain() {
        let proxy: ProxyEndpoint = "203.0.113.7:8080".parse().unwrap();
        assert_eq!(proxy.host, "203.0.113.7");
        assert_eq!(proxy.port, 8080);
        assert!(proxy.auth.is_none());
        assert_eq!(proxy.url(), "http://203.0.113.7:8080");
    }

    #[test]
    fn test_proxy_parse_with_credentials() {
        let proxy: ProxyEndpoint = "proxy.example.com:3128:alice:hunter2".parse().unwrap();
        let auth = proxy.auth.as_ref().unwrap();
        assert_eq!(auth.username, "alice");
        assert_eq!(auth.password, "hunter2");
        // URL never carries the credentials; they go into basic auth headers
        assert_eq!(proxy.url(), "http://proxy.example.com:3128");
    }

    #[test]
    fn test_proxy_rejects_malformed() {
        assert!("no-port".parse::<ProxyEndpoint>().is_err());
        assert!("host:notaport".parse::<ProxyEndpoint>().is_err());
        assert!("host:0".parse::<ProxyEndpoint>().is_err());
        assert!("host:80:useronly".parse::<ProxyEndpoint>().is_err());
    }

    #[test]
    fn test_proxy_error_redacts_password() {
        let err = "host:badport:alice:hunter2".parse::<ProxyEndpoint>().unwrap_err();
        assert!(!err.to_string().contains("hunter2"));
    }

    #[test]
    fn test_proxy_auth_debug_redacts_password() {
        let auth = ProxyAuth {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{auth:?}");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_session_state_terminality() {
        assert!(SessionState::Failed.is_terminal());
        assert!(SessionState::Stopped.is_terminal());
        assert!(!SessionState::Pinging.is_terminal());
        assert!(!SessionState::Unregistered.is_terminal());
    }
}
