// ============================================
// File: crates/nodewarden-common/src/lib.rs
// ============================================
//! # NodeWarden Common - Shared Domain Types
//!
//! ## Creation Reason
//! Provides the foundational domain types shared between the NodeWarden
//! binary crate and any future tooling, ensuring one canonical definition
//! of accounts, node identities, and proxy endpoints.
//!
//! ## Main Functionality
//! - [`types`]: Core type definitions (Account, NodeIdentity, ProxyEndpoint)
//! - [`error`]: Common error types and result aliases
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                nodewarden                   │
//! │   (config, gateway, worker, orchestrator)   │
//! │                     │                       │
//! │                     ▼                       │
//! │          nodewarden-common  ◄── You are here│
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Dependencies
//! - No internal crate dependencies (leaf node)
//! - Minimal external dependencies for maximum compatibility
//!
//! ## ⚠️ Important Note for Next Developer
//! - This crate is the foundation - changes affect everything
//! - Keep dependencies minimal
//! - Credential-bearing types must redact themselves in `Debug` output
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{CommonError, Result};
pub use types::{Account, NodeIdentity, ProxyEndpoint, SessionState, WorkerAssignment, NODES_PER_ACCOUNT};
