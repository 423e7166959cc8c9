// ============================================
// File: crates/nodewarden/src/gateway/mock.rs
// ============================================
//! # Mock Gateway Implementation
//!
//! ## Creation Reason
//! Provides an in-memory [`Gateway`] for testing workers and the
//! orchestrator without network access, proxies, or a live gateway API.
//!
//! ## Main Functionality
//! - Scripted failures per operation
//! - Scripted ping statuses (healthy / unhealthy)
//! - Call recording with virtual-clock timestamps
//!
//! ## Usage in Tests
//! ```
//! use std::sync::Arc;
//! use nodewarden::gateway::mock::{GatewayCall, MockGateway};
//! use nodewarden::gateway::Gateway;
//!
//! #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mock = Arc::new(MockGateway::new("203.0.113.5"));
//! let ip = mock.fetch_external_ip().await.unwrap();
//! assert_eq!(ip, "203.0.113.5");
//! assert_eq!(mock.call_count(GatewayCall::FetchIp), 1);
//! # }
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - This is for testing only - do not use in production
//! - Timestamps use `tokio::time::Instant` so paused-clock tests can
//!   assert on ping spacing
//! - Scripted errors are consumed once (`Option::take`)
//!
//! ## Last Modified
//! v0.1.0 - Initial mock implementation

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use tokio::time::Instant;

use nodewarden_common::types::NodeIdentity;

use super::models::{PingResult, RegistrationResult, SessionResult};
use super::Gateway;
use crate::error::{Result, WardenError};

// ============================================
// GatewayCall
// ============================================

/// Which gateway operation was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayCall {
    /// `fetch_external_ip`
    FetchIp,
    /// `register_node`
    Register,
    /// `start_session`
    StartSession,
    /// `ping_node`
    Ping,
}

// ============================================
// MockGateway
// ============================================

/// In-memory gateway double with scripted behavior.
///
/// # Defaults
/// Every operation succeeds and every ping reports `"ok"` until scripted
/// otherwise.
pub struct MockGateway {
    external_ip: String,
    register_error: Mutex<Option<WardenError>>,
    session_error: Mutex<Option<WardenError>>,
    /// Fails the ping whose 0-based sequence number matches.
    ping_failure: Mutex<Option<(usize, WardenError)>>,
    /// Statuses consumed one per ping; empty queue means `"ok"`.
    ping_statuses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(GatewayCall, Instant)>>,
}

impl MockGateway {
    /// Creates a mock that reports the given external IP.
    #[must_use]
    pub fn new(external_ip: impl Into<String>) -> Self {
        Self {
            external_ip: external_ip.into(),
            register_error: Mutex::new(None),
            session_error: Mutex::new(None),
            ping_failure: Mutex::new(None),
            ping_statuses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Scripts `register_node` to fail with `error`.
    pub fn fail_register(&self, error: WardenError) {
        *self.register_error.lock() = Some(error);
    }

    /// Scripts `start_session` to fail with `error`.
    pub fn fail_start_session(&self, error: WardenError) {
        *self.session_error.lock() = Some(error);
    }

    /// Scripts the `index`-th ping (0-based) to fail with `error`.
    pub fn fail_ping_at(&self, index: usize, error: WardenError) {
        *self.ping_failure.lock() = Some((index, error));
    }

    /// Enqueues a status for the next unscripted ping. Unqueued pings
    /// report `"ok"`.
    pub fn push_ping_status(&self, status: impl Into<String>) {
        self.ping_statuses.lock().push_back(status.into());
    }

    /// Returns every recorded call with its virtual timestamp.
    #[must_use]
    pub fn calls(&self) -> Vec<(GatewayCall, Instant)> {
        self.calls.lock().clone()
    }

    /// Returns how many times `kind` was invoked.
    #[must_use]
    pub fn call_count(&self, kind: GatewayCall) -> usize {
        self.calls.lock().iter().filter(|(c, _)| *c == kind).count()
    }

    /// Returns the timestamps of every ping call, in order.
    #[must_use]
    pub fn ping_instants(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .iter()
            .filter(|(c, _)| *c == GatewayCall::Ping)
            .map(|(_, at)| *at)
            .collect()
    }

    fn record(&self, call: GatewayCall) -> usize {
        let mut calls = self.calls.lock();
        let seq = calls.iter().filter(|(c, _)| *c == call).count();
        calls.push((call, Instant::now()));
        seq
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn fetch_external_ip(&self) -> Result<String> {
        self.record(GatewayCall::FetchIp);
        Ok(self.external_ip.clone())
    }

    async fn register_node(
        &self,
        node: &NodeIdentity,
        ip_address: &str,
    ) -> Result<RegistrationResult> {
        self.record(GatewayCall::Register);
        if let Some(error) = self.register_error.lock().take() {
            return Err(error);
        }
        Ok(RegistrationResult(json!({
            "nodeId": node.node_id,
            "ipAddress": ip_address,
        })))
    }

    async fn start_session(&self, node_id: &str) -> Result<SessionResult> {
        self.record(GatewayCall::StartSession);
        if let Some(error) = self.session_error.lock().take() {
            return Err(error);
        }
        Ok(SessionResult(json!({ "nodeId": node_id, "session": "started" })))
    }

    async fn ping_node(&self, node_id: &str) -> Result<Option<PingResult>> {
        let seq = self.record(GatewayCall::Ping);

        let failure = {
            let mut slot = self.ping_failure.lock();
            match *slot {
                Some((index, _)) if index == seq => slot.take().map(|(_, e)| e),
                _ => None,
            }
        };
        if let Some(error) = failure {
            return Err(error);
        }

        let status = self
            .ping_statuses
            .lock()
            .pop_front()
            .unwrap_or_else(|| "ok".to_string());

        let result: PingResult = serde_json::from_value(json!({
            "status": status,
            "nodeId": node_id,
        }))
        .map_err(|e| WardenError::protocol(e.to_string()))?;

        Ok(if result.is_ok() { Some(result) } else { None })
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> NodeIdentity {
        NodeIdentity::new("node-1", "hw-1").unwrap()
    }

    #[tokio::test]
    async fn test_defaults_succeed() {
        let mock = MockGateway::new("203.0.113.5");
        assert_eq!(mock.fetch_external_ip().await.unwrap(), "203.0.113.5");
        assert!(mock.register_node(&node(), "203.0.113.5").await.is_ok());
        assert!(mock.start_session("node-1").await.is_ok());
        assert!(mock.ping_node("node-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_scripted_register_failure_fires_once() {
        let mock = MockGateway::new("203.0.113.5");
        mock.fail_register(WardenError::Auth { status: 401 });

        let err = mock.register_node(&node(), "ip").await.unwrap_err();
        assert!(err.is_auth());
        // Script consumed; a retry from a fresh worker would succeed
        assert!(mock.register_node(&node(), "ip").await.is_ok());
    }

    #[tokio::test]
    async fn test_unhealthy_status_yields_none() {
        let mock = MockGateway::new("203.0.113.5");
        mock.push_ping_status("draining");

        assert!(mock.ping_node("node-1").await.unwrap().is_none());
        assert!(mock.ping_node("node-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_ping_failure_at_index() {
        let mock = MockGateway::new("203.0.113.5");
        mock.fail_ping_at(1, WardenError::protocol("connection reset"));

        assert!(mock.ping_node("node-1").await.is_ok());
        assert!(mock.ping_node("node-1").await.is_err());
        assert!(mock.ping_node("node-1").await.is_ok());
        assert_eq!(mock.call_count(GatewayCall::Ping), 3);
    }
}
