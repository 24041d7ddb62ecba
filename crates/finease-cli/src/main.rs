//! FinEase CLI - budget suggestion service
//!
//! Usage:
//!   finease serve --port 8000        Start the suggestion API
//!   finease suggest --token TOKEN    Print suggestions for one user
//!   finease ping                     Keep the deployed services awake

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Serve {
            port,
            host,
            no_auth,
            allowed_origins,
        } => commands::cmd_serve(&host, port, no_auth, allowed_origins).await,
        Commands::Suggest {
            token,
            rules_only,
            report,
        } => commands::cmd_suggest(&token, rules_only, report).await,
        Commands::Ping {
            urls,
            interval,
            timeout,
            once,
        } => commands::cmd_ping(&urls, interval, timeout, once).await,
    }
}
