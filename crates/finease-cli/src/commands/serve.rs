//! Server command implementation

use anyhow::{Context, Result};
use finease_core::EngineConfig;

pub async fn cmd_serve(
    host: &str,
    port: u16,
    no_auth: bool,
    allowed_origins: Vec<String>,
) -> Result<()> {
    let engine_config = EngineConfig::from_env().context("Invalid engine configuration")?;

    // Parse API keys from environment (comma-separated)
    let api_keys =
        finease_server::parse_api_keys(&std::env::var("SUGGESTION_API_KEY").unwrap_or_default());

    println!("🚀 Starting FinEase suggestion server...");
    println!("   Listening: http://{}:{}", host, port);
    println!("   Upstream: {}", engine_config.upstream_base_url);
    println!("   CORS origins: {}", allowed_origins.join(", "));
    match &engine_config.model {
        Some(model) => println!("   🤖 Model: {} via {}", model.model, model.base_url),
        None => println!("   🤖 Model: disabled (OPENROUTER_API_KEY not set)"),
    }

    if no_auth {
        println!();
        println!("   ⚠️  API key check DISABLED - do not expose to network!");
    } else if api_keys.is_empty() {
        anyhow::bail!("SUGGESTION_API_KEY is not set (use --no-auth for local development)");
    } else {
        println!(
            "   🔑 API keys: {} configured (SUGGESTION_API_KEY)",
            api_keys.len()
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = finease_server::ServerConfig {
        require_auth: !no_auth,
        api_keys,
        allowed_origins,
    };

    finease_server::serve(engine_config, host, port, config).await?;

    Ok(())
}
