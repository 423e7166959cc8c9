// ============================================
// File: crates/nodewarden/src/lib.rs
// ============================================
//! # NodeWarden Keeper Library
//!
//! ## Creation Reason
//! Registers a fleet of gateway nodes on behalf of multiple accounts,
//! each node routed through its own dedicated proxy, then keeps every
//! node's session alive with periodic pings, in parallel, until the
//! process is killed.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`config`]: TOML configuration management
//! - [`inputs`]: credential / node / proxy file loading
//! - [`gateway`]: HTTP client for the gateway API (plus a test mock)
//! - [`worker`]: the per-node register → session → ping state machine
//! - [`orchestrator`]: cardinality validation and worker fan-out
//! - [`error`]: keeper error taxonomy
//!
//! ## Architecture Overview
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        NodeWarden                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  inputs ──► orchestrator ──► worker ×N ──► gateway client    │
//! │  (3 files)  (validate 1:5:5,  (register,    (one per worker, │
//! │             pair, spawn,       session,      own proxy)      │
//! │             join)              ping loop)                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Workers are fully isolated: one failing node never affects its
//!   siblings, and there is no retry anywhere - a failed worker stays
//!   down until the process restarts
//! - The run has no natural end; shutdown is Ctrl-C (or the broadcast
//!   handle in tests)
//!
//! ## Last Modified
//! v0.1.0 - Initial keeper library

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod inputs;
pub mod orchestrator;
pub mod worker;

// Re-export primary types
pub use config::WardenConfig;
pub use error::{Result, WardenError};
pub use orchestrator::Orchestrator;
pub use worker::SessionWorker;
