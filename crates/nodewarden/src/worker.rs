// ============================================
// File: crates/nodewarden/src/worker.rs
// ============================================
//! # Node Session Worker
//!
//! ## Creation Reason
//! The core state machine of the keeper: drives exactly one node through
//! register → start-session → ping-forever, using exactly one account's
//! credential and exactly one proxy.
//!
//! ## State Machine
//! ```text
//! Unregistered ──register──► Registered ──start-session──► SessionActive
//!                                                               │
//!                                                               ▼
//!                      ┌──────────────── Pinging ◄──────────────┘
//!                      │    ping every interval, forever
//!                      │
//!        error ────────┴───────► Failed     shutdown ──► Stopped
//! ```
//!
//! ## Failure Policy
//! The ping loop treats a non-"ok" status as a silent no-op: transient
//! unhealthy status is tolerated without failing the worker, while
//! transport and protocol errors are not tolerated and end the worker.
//! This asymmetry is deliberate; do not "fix" it by failing on unhealthy
//! statuses or by retrying errors.
//!
//! ## ⚠️ Important Note for Next Developer
//! - `run` never returns an error: every failure is absorbed here, logged
//!   with the node ID, and reported as a terminal state. Sibling workers
//!   must never see it
//! - The inter-ping delay is the worker's only suspension point that
//!   observes the shutdown signal
//!
//! ## Last Modified
//! v0.1.0 - Initial worker implementation

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use nodewarden_common::types::{SessionState, WorkerAssignment};

use crate::error::Result;
use crate::gateway::Gateway;

// ============================================
// SessionWorker
// ============================================

/// Keeps one node's session alive.
///
/// # Lifecycle
/// 1. Create with [`SessionWorker::new`]
/// 2. Drive with [`SessionWorker::run`], which only returns on a terminal
///    state (error or shutdown signal) - in the common case it runs until
///    the process is killed
pub struct SessionWorker {
    assignment: WorkerAssignment,
    gateway: Arc<dyn Gateway>,
    ping_interval: Duration,
}

impl SessionWorker {
    /// Creates a worker for one assignment.
    ///
    /// # Arguments
    /// * `assignment` - The (account, node, proxy) triple bound at spawn
    /// * `gateway` - Client already bound to this assignment's account and
    ///   proxy
    /// * `ping_interval` - Delay between keep-alive pings
    #[must_use]
    pub fn new(
        assignment: WorkerAssignment,
        gateway: Arc<dyn Gateway>,
        ping_interval: Duration,
    ) -> Self {
        Self {
            assignment,
            gateway,
            ping_interval,
        }
    }

    /// Returns the node ID this worker is responsible for.
    #[must_use]
    pub fn node_id(&self) -> &str {
        &self.assignment.node.node_id
    }

    /// Runs the state machine to a terminal state.
    ///
    /// Every error is absorbed at this boundary: it is logged with the
    /// node ID and turned into [`SessionState::Failed`] without touching
    /// sibling workers.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> SessionState {
        let node_id = self.assignment.node.node_id.clone();
        info!(
            worker = self.assignment.index,
            node_id = %node_id,
            proxy = %self.assignment.proxy,
            "worker starting"
        );

        match self.drive(&mut shutdown).await {
            Ok(state) => {
                info!(node_id = %node_id, state = %state, "worker stopped");
                state
            }
            Err(e) => {
                error!(node_id = %node_id, error = %e, "worker failed");
                SessionState::Failed
            }
        }
    }

    /// The sequential register → session → ping chain.
    ///
    /// Returns `Ok(Stopped)` when the shutdown signal fires; any error
    /// propagates to [`SessionWorker::run`] for logging.
    async fn drive(&self, shutdown: &mut broadcast::Receiver<()>) -> Result<SessionState> {
        let node = &self.assignment.node;

        // Unregistered → Registered
        let ip_address = self.gateway.fetch_external_ip().await?;
        self.gateway.register_node(node, &ip_address).await?;
        debug!(node_id = %node.node_id, state = %SessionState::Registered, "state transition");

        // Registered → SessionActive
        self.gateway.start_session(&node.node_id).await?;
        debug!(node_id = %node.node_id, state = %SessionState::SessionActive, "state transition");

        // SessionActive → Pinging
        info!(node_id = %node.node_id, interval_secs = self.ping_interval.as_secs(), "entering ping loop");
        let mut ticker = tokio::time::interval(self.ping_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    return Ok(SessionState::Stopped);
                }
                _ = ticker.tick() => {
                    match self.gateway.ping_node(&node.node_id).await? {
                        Some(_) => debug!(node_id = %node.node_id, "ping ok"),
                        // Acknowledged but not healthy: quiet no-op
                        None => {}
                    }
                }
            }
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WardenError;
    use crate::gateway::mock::{GatewayCall, MockGateway};

    use nodewarden_common::types::{Account, NodeIdentity, ProxyEndpoint};

    fn assignment(index: usize) -> WorkerAssignment {
        WorkerAssignment {
            index,
            account: Account::new(format!("token-{}", index / 5)).unwrap(),
            node: NodeIdentity::new(format!("node-{index}"), format!("hw-{index}")).unwrap(),
            proxy: format!("203.0.113.{}:8080", index + 1).parse::<ProxyEndpoint>().unwrap(),
        }
    }

    fn worker(mock: &Arc<MockGateway>) -> SessionWorker {
        SessionWorker::new(
            assignment(0),
            Arc::clone(mock) as Arc<dyn Gateway>,
            Duration::from_secs(60),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_happy_path_pings_with_interval_spacing() {
        let mock = Arc::new(MockGateway::new("203.0.113.5"));
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(worker(&mock).run(shutdown_rx));

        // Virtual clock: pings land at t=0, 60, 120, 180
        tokio::time::sleep(Duration::from_secs(200)).await;
        shutdown_tx.send(()).unwrap();

        let state = handle.await.unwrap();
        assert_eq!(state, SessionState::Stopped);

        assert_eq!(mock.call_count(GatewayCall::FetchIp), 1);
        assert_eq!(mock.call_count(GatewayCall::Register), 1);
        assert_eq!(mock.call_count(GatewayCall::StartSession), 1);

        let pings = mock.ping_instants();
        assert!(pings.len() >= 3, "expected several pings, got {}", pings.len());
        for pair in pings.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(60));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_ping_fires_immediately() {
        let mock = Arc::new(MockGateway::new("203.0.113.5"));
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(worker(&mock).run(shutdown_rx));

        // Well under one interval: the first tick must already have fired
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(mock.call_count(GatewayCall::Ping), 1);

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_register_auth_failure_never_starts_session() {
        let mock = Arc::new(MockGateway::new("203.0.113.5"));
        mock.fail_register(WardenError::Auth { status: 401 });
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let state = worker(&mock).run(shutdown_rx).await;

        assert_eq!(state, SessionState::Failed);
        assert_eq!(mock.call_count(GatewayCall::StartSession), 0);
        assert_eq!(mock.call_count(GatewayCall::Ping), 0);
    }

    #[tokio::test]
    async fn test_start_session_failure_is_terminal() {
        let mock = Arc::new(MockGateway::new("203.0.113.5"));
        mock.fail_start_session(WardenError::Api {
            status: 500,
            body: "boom".to_string(),
        });
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let state = worker(&mock).run(shutdown_rx).await;

        assert_eq!(state, SessionState::Failed);
        assert_eq!(mock.call_count(GatewayCall::Ping), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unhealthy_ping_status_does_not_fail_worker() {
        let mock = Arc::new(MockGateway::new("203.0.113.5"));
        mock.push_ping_status("draining");
        mock.push_ping_status("rate-limited");
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(worker(&mock).run(shutdown_rx));

        // Two unhealthy pings plus at least one healthy one
        tokio::time::sleep(Duration::from_secs(130)).await;
        shutdown_tx.send(()).unwrap();

        let state = handle.await.unwrap();
        assert_eq!(state, SessionState::Stopped);
        assert!(mock.call_count(GatewayCall::Ping) >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ping_error_fails_worker() {
        let mock = Arc::new(MockGateway::new("203.0.113.5"));
        mock.fail_ping_at(1, WardenError::protocol("connection reset"));
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let state = worker(&mock).run(shutdown_rx).await;

        assert_eq!(state, SessionState::Failed);
        assert_eq!(mock.call_count(GatewayCall::Ping), 2);
    }
}
