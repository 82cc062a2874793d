//! Typed errors for the price tracking pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Per the propagation
//! policy, most failures in this crate never surface as errors at all:
//! extraction misses become sentinel values, unparseable prices become
//! `None`, and a failed site becomes an empty result set. These types
//! cover the remaining genuinely fatal conditions (storage and
//! collaborator plumbing).

use thiserror::Error;

/// Errors that can occur during pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Page fetch failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Collaborator (text-generation service) unavailable or failed
    #[error("assistant error: {0}")]
    Assistant(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Storage operation failed
    #[error("storage error at {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while fetching pages.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Connection or navigation timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Anti-bot challenge or redirect detected
    #[error("bot challenge at: {url}")]
    BotChallenge { url: String },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
