//! CLI argument definitions using clap
//!
//! The command implementations are in the `commands` module.

use clap::{Parser, Subcommand};

/// Default ping targets: the suggestion API and the upstream backend
pub const DEFAULT_PING_URLS: [&str; 2] = [
    "https://finease-suggestion-api.onrender.com/",
    "https://finease-0dj7.onrender.com/",
];

/// FinEase - budget alerts and spending tips
#[derive(Parser)]
#[command(name = "finease")]
#[command(about = "Budget suggestion service for the FinEase app", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the suggestion API server
    ///
    /// Reads NODE_API_BASE, OPENROUTER_* and SUGGESTION_API_KEY from the environment.
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable the x-api-key check (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        #[arg(long)]
        no_auth: bool,

        /// Allowed CORS origin (repeatable, "*" allows any)
        #[arg(long = "allowed-origin", default_value = "*")]
        allowed_origins: Vec<String>,
    },

    /// Compute suggestions for one user and print them as JSON
    Suggest {
        /// The user's bearer token for the upstream backend
        #[arg(short, long)]
        token: String,

        /// Skip the language model, print threshold suggestions only
        #[arg(long)]
        rules_only: bool,

        /// Also print a per-category budget table
        #[arg(long)]
        report: bool,
    },

    /// Periodically request URLs so hosted instances stay awake
    Ping {
        /// URL to ping (repeatable)
        #[arg(short, long = "url", default_values = DEFAULT_PING_URLS)]
        urls: Vec<String>,

        /// Seconds between rounds
        #[arg(short, long, default_value = "60")]
        interval: u64,

        /// Per-request timeout in seconds
        #[arg(long, default_value = "15")]
        timeout: u64,

        /// Ping each URL once and exit
        #[arg(long)]
        once: bool,
    },
}
