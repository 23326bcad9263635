//! # CLI Interface
//!
//! Defines the command-line argument structure for `starchain-node` using
//! `clap` derive. Four subcommands: `run`, `keygen`, `sign`, and `version`.

use clap::{Parser, Subcommand};

use starchain_protocol::config::CHALLENGE_WINDOW_SECS;

/// Starchain registry node.
///
/// Serves the star registry over HTTP: challenge issuance, signed star
/// submissions, block lookups, owner queries, and chain audits.
#[derive(Parser, Debug)]
#[command(
    name = "starchain-node",
    about = "Starchain star registry node",
    version,
    propagate_version = true
)]
pub struct StarchainCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the node binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the registry API server.
    Run(RunArgs),
    /// Generate a fresh Ed25519 wallet key and print its address.
    Keygen,
    /// Sign a challenge message with a hex-encoded secret key.
    Sign(SignArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Interface to bind.
    #[arg(long, env = "STARCHAIN_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the REST API.
    #[arg(long, short = 'p', env = "STARCHAIN_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "STARCHAIN_METRICS_PORT", default_value_t = 9742)]
    pub metrics_port: u16,

    /// Seconds a signed challenge stays valid.
    #[arg(long, env = "STARCHAIN_CHALLENGE_WINDOW", default_value_t = CHALLENGE_WINDOW_SECS)]
    pub challenge_window: u64,

    /// Log output format: `pretty` or `json`.
    #[arg(long, env = "STARCHAIN_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

/// Arguments for the `sign` subcommand.
#[derive(Parser, Debug)]
pub struct SignArgs {
    /// Hex-encoded 32-byte Ed25519 secret key.
    ///
    /// **Development only.** Secrets passed on the command line end up in
    /// shell history.
    #[arg(long, env = "STARCHAIN_SECRET_KEY")]
    pub secret_key: String,

    /// The challenge message returned by `/requestValidation`.
    #[arg(long, short = 'm')]
    pub message: String,
}
