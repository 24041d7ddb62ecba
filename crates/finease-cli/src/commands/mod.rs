//! CLI command implementations
//!
//! - `serve` - Suggestion API server
//! - `suggest` - One-off suggestions for a user token
//! - `ping` - Keep-alive pinger for hosted deployments

pub mod ping;
pub mod serve;
pub mod suggest;

// Re-export command functions for main.rs
pub use ping::*;
pub use serve::*;
pub use suggest::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
