//! Unified error types for the crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error for knowledge-base operations.
///
/// Every variant names the underlying cause; retrieval is never retried.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("knowledge base transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The retrieval endpoint answered with a non-success status.
    #[error("knowledge base returned HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Reply body was not JSON at all.
    #[error("knowledge base reply is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
