//! Error types for the load test.
//!
//! User behavior never surfaces these to its callers; they exist so the
//! transport and configuration layers can report what went wrong.

use thiserror::Error;

/// Errors produced while issuing a request against the chat API
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failure, timeout or any other HTTP client error
    #[error("HTTP request to {route} failed: {source}")]
    Http {
        route: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request body could not be encoded
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// Failure injected by a test transport
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Invalid run configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("user count must be greater than zero")]
    NoUsers,

    #[error("spawn rate must be positive and yield a non-zero spawn interval, got {0}")]
    InvalidSpawnRate(f64),

    #[error("wait-min ({min}s) must not exceed wait-max ({max}s)")]
    InvalidWaitRange { min: f64, max: f64 },

    #[error("unknown task '{0}'")]
    UnknownTask(String),

    #[error("at least one task must be selected")]
    NoTasks,

    #[error("invalid host URL '{0}'")]
    InvalidHost(String),
}
