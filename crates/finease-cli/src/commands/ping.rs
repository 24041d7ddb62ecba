//! Ping command implementation
//!
//! Free hosting tiers put idle services to sleep; requesting each URL on a
//! fixed interval keeps them warm. Failures are reported and never stop the loop.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, warn};

pub async fn cmd_ping(urls: &[String], interval: u64, timeout: u64, once: bool) -> Result<()> {
    if urls.is_empty() {
        anyhow::bail!("No URLs to ping");
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()
        .context("Failed to build HTTP client")?;

    if !once {
        println!(
            "📡 Pinging {} URL(s) every {}s (Ctrl+C to stop)",
            urls.len(),
            interval
        );
    }

    loop {
        for url in urls {
            println!("{}", ping_url(&client, url).await);
        }

        if once {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_secs(interval)).await;
    }
}

/// Request `url` once and describe the outcome as a timestamped line
pub async fn ping_url(client: &Client, url: &str) -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

    match client.get(url).send().await {
        Ok(response) => {
            debug!(url, status = %response.status(), "Ping ok");
            format!(
                "[{}] Ping {} - Status: {}",
                timestamp,
                url,
                response.status().as_u16()
            )
        }
        Err(e) => {
            warn!(url, error = %e, "Ping failed");
            format!("[{}] Ping {} - Error: {}", timestamp, url, e)
        }
    }
}
