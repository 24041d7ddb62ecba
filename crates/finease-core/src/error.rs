//! Error types for FinEase

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Upstream fetch failed for {endpoint}: {reason}")]
    UpstreamFetch { endpoint: String, reason: String },

    #[error("Model call failed: {0}")]
    ModelCall(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn upstream(endpoint: &str, reason: impl std::fmt::Display) -> Self {
        Error::UpstreamFetch {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error came from one of the upstream reads
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::UpstreamFetch { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
