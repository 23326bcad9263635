// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Starchain Registry Node
//!
//! Entry point for the `starchain-node` binary. Parses CLI arguments,
//! initializes logging and metrics, builds the in-memory star registry, and
//! serves the REST API.
//!
//! The binary supports four subcommands:
//!
//! - `run`     — start the registry API server
//! - `keygen`  — generate a wallet key for trying the API
//! - `sign`    — sign a challenge with a wallet key
//! - `version` — print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use std::sync::Arc;
use tokio::signal;

use starchain_protocol::clock::SystemClock;
use starchain_protocol::config::{RegistryConfig, PROTOCOL_VERSION};
use starchain_protocol::crypto::{address_of, sign_message, Ed25519Verifier};
use starchain_protocol::registry::StarRegistry;

use cli::{Commands, StarchainCli};
use logging::LogFormat;
use metrics::NodeMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = StarchainCli::parse();

    match cli.command {
        Commands::Run(args) => run_node(args).await,
        Commands::Keygen => {
            keygen();
            Ok(())
        }
        Commands::Sign(args) => sign(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the registry: API server and metrics endpoint.
async fn run_node(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(
        "starchain_node=info,starchain_protocol=info,tower_http=debug",
        LogFormat::from_str_lossy(&args.log_format),
    );

    tracing::info!(
        port = args.port,
        metrics_port = args.metrics_port,
        challenge_window = args.challenge_window,
        "starting starchain-node"
    );

    // --- Registry ---
    let registry = Arc::new(StarRegistry::with_config(
        RegistryConfig::with_window_secs(args.challenge_window),
        Arc::new(Ed25519Verifier),
        Arc::new(SystemClock),
    ));
    registry.initialize();

    // --- Metrics ---
    let node_metrics = Arc::new(NodeMetrics::new());
    node_metrics.chain_height.set(registry.chain_height());

    // --- Application state ---
    let app_state = api::AppState {
        version: format!(
            "{} (protocol {})",
            env!("CARGO_PKG_VERSION"),
            PROTOCOL_VERSION,
        ),
        registry,
        metrics: Arc::clone(&node_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("{}:{}", args.host, args.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&node_metrics));
    let metrics_addr = format!("{}:{}", args.host, args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received");
        }
    }

    tracing::info!("starchain-node stopped");
    Ok(())
}

/// Prints a fresh secret key and its registry address.
fn keygen() {
    let key = SigningKey::generate(&mut OsRng);
    println!("secret_key : {}", hex::encode(key.to_bytes()));
    println!("address    : {}", address_of(&key));
}

/// Signs a challenge and prints the hex signature to stdout.
fn sign(args: cli::SignArgs) -> Result<()> {
    let bytes = hex::decode(args.secret_key.trim()).context("secret key is not valid hex")?;
    let secret: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("secret key must be 32 bytes, got {}", b.len()))?;
    let key = SigningKey::from_bytes(&secret);
    println!("{}", sign_message(&key, &args.message));
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("starchain-node {}", env!("CARGO_PKG_VERSION"));
    println!("protocol       {}", PROTOCOL_VERSION);
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
