// ============================================
// File: crates/nodewarden/src/orchestrator.rs
// ============================================
//! # Fan-out Orchestrator
//!
//! ## Creation Reason
//! Validates the 1-account : 5-nodes : 5-proxies invariant, pairs every
//! assignment deterministically, and runs one session worker per
//! assignment concurrently until all of them reach a terminal state.
//!
//! ## Main Functionality
//! - `build_assignments`: cardinality check + deterministic pairing
//! - `Orchestrator::run`: spawns workers on a `JoinSet` and joins them
//!
//! ## Pairing Rule
//! ```text
//! assignment i  ──►  account[i / 5], node[i], proxy[i]
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - A cardinality violation aborts the entire run before any gateway
//!   client is even constructed - no network activity on mismatch
//! - Worker failures never bubble up here; the join loop only collects
//!   terminal states. In the common case the run blocks forever, since
//!   the ping loop has no natural terminus
//!
//! ## Last Modified
//! v0.1.0 - Initial orchestrator implementation

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{error, info};

use nodewarden_common::types::{
    Account, NodeIdentity, ProxyEndpoint, SessionState, WorkerAssignment, NODES_PER_ACCOUNT,
};

use crate::error::{Result, WardenError};
use crate::gateway::Gateway;
use crate::worker::SessionWorker;

// ============================================
// Assignment Building
// ============================================

/// Validates cardinality and pairs accounts, nodes, and proxies.
///
/// # Errors
/// Returns [`WardenError::CardinalityMismatch`] unless
/// `nodes.len() == proxies.len() == NODES_PER_ACCOUNT * accounts.len()`.
pub fn build_assignments(
    accounts: &[Account],
    nodes: &[NodeIdentity],
    proxies: &[ProxyEndpoint],
) -> Result<Vec<WorkerAssignment>> {
    let expected = accounts.len() * NODES_PER_ACCOUNT;
    if nodes.len() != expected || proxies.len() != expected {
        return Err(WardenError::CardinalityMismatch {
            accounts: accounts.len(),
            nodes: nodes.len(),
            proxies: proxies.len(),
        });
    }

    let assignments = nodes
        .iter()
        .zip(proxies.iter())
        .enumerate()
        .map(|(index, (node, proxy))| WorkerAssignment {
            index,
            account: accounts[index / NODES_PER_ACCOUNT].clone(),
            node: node.clone(),
            proxy: proxy.clone(),
        })
        .collect();

    Ok(assignments)
}

// ============================================
// Orchestrator
// ============================================

/// Launches and joins the full worker fan-out.
///
/// # Lifecycle
/// 1. Create with [`Orchestrator::new`]
/// 2. Optionally grab the shutdown handle for signal wiring
/// 3. `run` with a gateway factory; blocks until every worker is terminal
///    (i.e. forever, unless workers fail or shutdown fires)
pub struct Orchestrator {
    accounts: Vec<Account>,
    nodes: Vec<NodeIdentity>,
    proxies: Vec<ProxyEndpoint>,
    ping_interval: Duration,
    shutdown_tx: broadcast::Sender<()>,
}

impl Orchestrator {
    /// Creates an orchestrator over the three loaded input lists.
    #[must_use]
    pub fn new(
        accounts: Vec<Account>,
        nodes: Vec<NodeIdentity>,
        proxies: Vec<ProxyEndpoint>,
        ping_interval: Duration,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            accounts,
            nodes,
            proxies,
            ping_interval,
            shutdown_tx,
        }
    }

    /// Returns a handle that stops every worker when signalled.
    #[must_use]
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Spawns one worker per assignment and waits for all of them.
    ///
    /// `make_gateway` builds the per-worker client bound to the
    /// assignment's account and proxy. Production passes an
    /// [`crate::gateway::HttpGateway`] constructor; tests pass a mock
    /// factory.
    ///
    /// # Errors
    /// Fails before any spawn on cardinality mismatch, or if a gateway
    /// cannot be constructed for an assignment.
    pub async fn run<F>(self, make_gateway: F) -> Result<Vec<SessionState>>
    where
        F: Fn(&WorkerAssignment) -> Result<Arc<dyn Gateway>>,
    {
        let assignments = build_assignments(&self.accounts, &self.nodes, &self.proxies)?;
        info!(
            accounts = self.accounts.len(),
            workers = assignments.len(),
            "launching worker fan-out"
        );

        let mut tasks = JoinSet::new();
        for assignment in assignments {
            let gateway = make_gateway(&assignment)?;
            let worker = SessionWorker::new(assignment, gateway, self.ping_interval);
            let shutdown_rx = self.shutdown_tx.subscribe();
            tasks.spawn(worker.run(shutdown_rx));
        }

        // Join barrier: in the common case this waits forever, because a
        // healthy ping loop never ends.
        let mut states = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(state) => states.push(state),
                Err(e) => {
                    // A panicked worker counts as failed; siblings keep going
                    error!(error = %e, "worker task aborted");
                    states.push(SessionState::Failed);
                }
            }
        }

        info!(workers = states.len(), "all workers reached a terminal state");
        Ok(states)
    }
}

// ============================================
// Tests
// ============================================
