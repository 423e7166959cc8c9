// ============================================
// File: crates/nodewarden/src/gateway/mod.rs
// ============================================
//! # Gateway Client Module
//!
//! ## Creation Reason
//! Translates the four domain operations (fetch external IP, register
//! node, start session, ping node) into HTTP requests against the gateway
//! API, always routed through the caller's dedicated proxy.
//!
//! ## Main Functionality
//! - [`Gateway`]: The operation trait; workers only see this
//! - [`client::HttpGateway`]: reqwest-backed implementation, one per worker
//! - [`mock::MockGateway`]: in-memory double for deterministic tests
//! - [`config::GatewayConfig`]: URLs, timeout, ping interval
//!
//! ## Request Flow
//! ```text
//! Worker ──► Gateway trait ──► HttpGateway ──► proxy ──► gateway API
//!                     │
//!                     └──► MockGateway (tests)
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - One `HttpGateway` (and its connection pool) per worker; never share
//!   a client across workers, proxies are dedicated per node
//! - No retries at this layer - a single failed call propagates
//!
//! ## Last Modified
//! v0.1.0 - Initial gateway module

use async_trait::async_trait;

use nodewarden_common::types::NodeIdentity;

use crate::error::Result;

pub mod client;
pub mod config;
pub mod mock;
pub mod models;

pub use client::HttpGateway;
pub use config::GatewayConfig;
pub use models::{PingResult, RegistrationResult, SessionResult};

/// The four gateway operations, bound to one worker's account and proxy.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so workers can hold them across
/// await points.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetches the external IP address as seen through the proxy.
    ///
    /// # Errors
    /// Network-class error on transport failure or non-2xx status;
    /// protocol error if the response lacks an `ip` field.
    async fn fetch_external_ip(&self) -> Result<String>;

    /// Registers the node, reporting its external IP and hardware ID.
    ///
    /// # Errors
    /// Auth error on 401/403, network error on transport failure,
    /// API error on any other non-2xx status.
    async fn register_node(&self, node: &NodeIdentity, ip_address: &str)
        -> Result<RegistrationResult>;

    /// Starts the server-side session for a registered node.
    ///
    /// Can take materially longer than the other calls; it shares the
    /// configured request timeout.
    ///
    /// # Errors
    /// Same taxonomy as [`Gateway::register_node`].
    async fn start_session(&self, node_id: &str) -> Result<SessionResult>;

    /// Pings the node's session.
    ///
    /// Returns `Some` only when the gateway reported status `"ok"`. Any
    /// other status yields `None` - acknowledged but not healthy, which
    /// callers treat as a quiet no-op.
    ///
    /// # Errors
    /// Same taxonomy as [`Gateway::register_node`].
    async fn ping_node(&self, node_id: &str) -> Result<Option<PingResult>>;
}
