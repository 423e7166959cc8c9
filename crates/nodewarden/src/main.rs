// ============================================
// File: crates/nodewarden/src/main.rs
// ============================================
//! # NodeWarden Entry Point
//!
//! ## Creation Reason
//! Main entry point for the NodeWarden keeper binary. Handles CLI
//! parsing, logging setup, input preflight, and the worker fan-out.
//!
//! ## Usage
//! ```bash
//! # Check the credential files without touching the network
//! nodewarden check
//!
//! # Validate the config file
//! nodewarden validate
//!
//! # Run the keeper (blocks until Ctrl-C)
//! nodewarden run
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - `run` exits non-zero on a cardinality mismatch before any network
//!   activity; otherwise it blocks until externally terminated
//! - Ctrl-C triggers the shutdown broadcast, which every worker observes
//!   at its ping suspension point
//!
//! ## Last Modified
//! v0.1.0 - Initial CLI implementation

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nodewarden::gateway::{Gateway, HttpGateway};
use nodewarden::inputs::InputSet;
use nodewarden::orchestrator::build_assignments;
use nodewarden::{Orchestrator, WardenConfig};
use nodewarden_common::NODES_PER_ACCOUNT;

// ============================================
// CLI Definition
// ============================================

/// NodeWarden - keeps registered gateway nodes alive.
///
/// Quick Start:
///   1. Put bearer tokens in user.txt, node IDs in id.txt, proxies in proxy.txt
///   2. Run: nodewarden check
///   3. Run: nodewarden run
#[derive(Parser, Debug)]
#[command(name = "nodewarden")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register every node and keep all sessions alive until killed
    Run {
        /// Path to configuration file
        #[arg(short, long, default_value = "nodewarden.toml")]
        config: PathBuf,
    },

    /// Check the input files and the 1:5:5 invariant (no network)
    Check {
        /// Path to configuration file
        #[arg(short, long, default_value = "nodewarden.toml")]
        config: PathBuf,
    },

    /// Validate the configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = "nodewarden.toml")]
        config: PathBuf,
    },
}

// ============================================
// Main
// ============================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging("info");

    let result = match cli.command {
        Commands::Run { config } => cmd_run(config).await,
        Commands::Check { config } => cmd_check(config).await,
        Commands::Validate { config } => cmd_validate(config).await,
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

// ============================================
// Commands
// ============================================

/// Runs the keeper until killed.
async fn cmd_run(config_path: PathBuf) -> anyhow::Result<()> {
    let config = load_or_default_config(&config_path).await?;

    // Re-initialize logging with config level
    init_logging(&config.logging.level);

    display_banner();

    let inputs = InputSet::load(&config.inputs).await?;

    let ping_interval = Duration::from_secs(config.gateway.ping_interval_secs);
    let orchestrator = Orchestrator::new(
        inputs.accounts,
        inputs.nodes,
        inputs.proxies,
        ping_interval,
    );

    // Ctrl-C → shutdown broadcast → every worker stops at its next
    // suspension point
    let shutdown = orchestrator.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            let _ = shutdown.send(());
        }
    });

    let gateway_config = config.gateway.clone();
    let states = orchestrator
        .run(move |assignment| {
            let gateway = HttpGateway::connect(
                gateway_config.clone(),
                assignment.account.clone(),
                &assignment.proxy,
            )?;
            Ok(Arc::new(gateway) as Arc<dyn Gateway>)
        })
        .await?;

    info!(workers = states.len(), "run finished");
    Ok(())
}

/// Checks the input files without any network activity.
async fn cmd_check(config_path: PathBuf) -> anyhow::Result<()> {
    let config = load_or_default_config(&config_path).await?;
    let inputs = InputSet::load(&config.inputs).await?;

    println!();
    println!("NodeWarden Input Check");
    println!("════════════════════════════════════════");
    println!();
    println!("   Accounts:  {:>4}  ({})", inputs.accounts.len(), config.inputs.accounts_file);
    println!("   Nodes:     {:>4}  ({})", inputs.nodes.len(), config.inputs.nodes_file);
    println!("   Proxies:   {:>4}  ({})", inputs.proxies.len(), config.inputs.proxies_file);
    println!();

    match build_assignments(&inputs.accounts, &inputs.nodes, &inputs.proxies) {
        Ok(assignments) => {
            println!(
                "✅ Invariant holds: every account has {NODES_PER_ACCOUNT} nodes and {NODES_PER_ACCOUNT} proxies"
            );
            println!("   {} worker(s) would be launched", assignments.len());
            println!();
            Ok(())
        }
        Err(e) => {
            println!("❌ {e}");
            println!();
            std::process::exit(1);
        }
    }
}

/// Validates the configuration file.
async fn cmd_validate(config_path: PathBuf) -> anyhow::Result<()> {
    if !config_path.exists() {
        println!("⚠️  Config file not found: {}", config_path.display());
        println!("   The keeper will use default values.");
        return Ok(());
    }

    let config = WardenConfig::load(&config_path).await?;

    println!("✅ Configuration is valid");
    println!();
    println!("Gateway:");
    println!("   API base:       {}", config.gateway.api_base_url);
    println!("   IP service:     {}", config.gateway.ip_service_url);
    println!("   Timeout:        {}s", config.gateway.request_timeout_secs);
    println!("   Ping interval:  {}s", config.gateway.ping_interval_secs);
    println!();
    println!("Inputs:");
    println!("   Accounts:       {}", config.inputs.accounts_file);
    println!("   Nodes:          {}", config.inputs.nodes_file);
    println!("   Proxies:        {}", config.inputs.proxies_file);
    println!();

    Ok(())
}

// ============================================
// Helper Functions
// ============================================

/// Initializes the tracing subscriber.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .ok();
}

/// Loads config, or falls back to defaults when the file is absent.
async fn load_or_default_config(path: &PathBuf) -> anyhow::Result<WardenConfig> {
    if path.exists() {
        Ok(WardenConfig::load(path).await?)
    } else {
        info!("Config file not found, using defaults");
        Ok(WardenConfig::default())
    }
}

/// Prints the startup banner.
fn display_banner() {
    println!();
    println!(r"  _  _         _      _    _                 _");
    println!(r" | \| |___  __| |___ | |  | |__ _ _ _ __| |___ _ _");
    println!(r" | .` / _ \/ _` / -_)| |/\| / _` | '_/ _` / -_) ' \");
    println!(r" |_|\_\___/\__,_\___||__/\__/\__,_|_| \__,_\___|_||_|");
    println!();
    println!(" NodeWarden v{}", env!("CARGO_PKG_VERSION"));
    println!("════════════════════════════════════════");
    println!();
}
