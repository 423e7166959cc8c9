// ============================================
// File: crates/nodewarden/src/inputs.rs
// ============================================
//! # Credential and Proxy Input Loading
//!
//! ## Creation Reason
//! Reads the three line-oriented input files (accounts, node identities,
//! proxy endpoints) into structured lists for the orchestrator.
//!
//! ## File Formats
//! - accounts file: one bearer token per line
//! - node file: one `nodeId:hardwareId` per line (lines without a colon
//!   are skipped)
//! - proxy file: one `host:port` or `host:port:user:pass` per line
//!
//! Blank lines are skipped everywhere.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Parsing is split into pure `&str` functions so tests need no
//!   filesystem; the async loaders only add I/O and error context
//!
//! ## Last Modified
//! v0.1.0 - Initial input loading

use std::path::Path;

use tracing::info;

use nodewarden_common::types::{Account, NodeIdentity, ProxyEndpoint};

use crate::config::InputsConfig;
use crate::error::{Result, WardenError};

// ============================================
// InputSet
// ============================================

/// The three parallel lists the orchestrator fans out over.
#[derive(Debug, Clone)]
pub struct InputSet {
    /// Bearer credentials, one per account.
    pub accounts: Vec<Account>,
    /// Node identities, five per account.
    pub nodes: Vec<NodeIdentity>,
    /// Dedicated proxy endpoints, one per node.
    pub proxies: Vec<ProxyEndpoint>,
}

impl InputSet {
    /// Loads all three input files named by the configuration.
    ///
    /// # Errors
    /// Returns `InputLoad` on I/O failure and a parse error for the first
    /// malformed token encountered.
    pub async fn load(config: &InputsConfig) -> Result<Self> {
        let accounts = parse_accounts(&read_input(&config.accounts_file).await?)?;
        let nodes = parse_node_identities(&read_input(&config.nodes_file).await?)?;
        let proxies = parse_proxies(&read_input(&config.proxies_file).await?)?;

        info!(
            accounts = accounts.len(),
            nodes = nodes.len(),
            proxies = proxies.len(),
            "inputs loaded"
        );

        Ok(Self { accounts, nodes, proxies })
    }
}

async fn read_input(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| WardenError::input_load(path.display().to_string(), e.to_string()))
}

// ============================================
// Parse Functions
// ============================================

/// Parses the accounts file: one bearer token per non-blank line.
pub fn parse_accounts(content: &str) -> Result<Vec<Account>> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Account::new(line).map_err(WardenError::from))
        .collect()
}

/// Parses the node file: one `nodeId:hardwareId` per line.
///
/// Lines without a colon are skipped rather than rejected, so the file
/// may carry comments or stray text between entries.
pub fn parse_node_identities(content: &str) -> Result<Vec<NodeIdentity>> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.contains(':'))
        .map(|line| line.parse::<NodeIdentity>().map_err(WardenError::from))
        .collect()
}

/// Parses the proxy file: one `host:port[:user:pass]` per non-blank line.
pub fn parse_proxies(content: &str) -> Result<Vec<ProxyEndpoint>> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.parse::<ProxyEndpoint>().map_err(WardenError::from))
        .collect()
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accounts_skips_blank_lines() {
        let accounts = parse_accounts("token-a\n\n  \ntoken-b\n").unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].token(), "token-a");
        assert_eq!(accounts[1].token(), "token-b");
    }

    #[test]
    fn test_parse_node_identities_skips_lines_without_colon() {
        let content = "node-1:hw-1\nnot a node line\nnode-2:hw-2\n";
        let nodes = parse_node_identities(content).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].node_id, "node-2");
    }

    #[test]
    fn test_parse_node_identities_rejects_empty_parts() {
        assert!(parse_node_identities("node-1:\n").is_err());
    }

    #[test]
    fn test_parse_proxies() {
        let content = "203.0.113.1:8080\nproxy.example.com:3128:alice:hunter2\n";
        let proxies = parse_proxies(content).unwrap();
        assert_eq!(proxies.len(), 2);
        assert!(proxies[0].auth.is_none());
        assert!(proxies[1].auth.is_some());
    }

    #[test]
    fn test_parse_proxies_rejects_malformed() {
        assert!(parse_proxies("no-port-here\n").is_err());
    }

    #[tokio::test]
    async fn test_load_reports_missing_file() {
        let config = InputsConfig {
            accounts_file: "/nonexistent/user.txt".to_string(),
            nodes_file: "/nonexistent/id.txt".to_string(),
            proxies_file: "/nonexistent/proxy.txt".to_string(),
        };
        let err = InputSet::load(&config).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("/nonexistent/user.txt"));
    }
}
