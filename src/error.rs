//! Error types for fcs-aggregator-client
//!
//! This module provides error handling for the library, including:
//! - Configuration errors raised before any network call
//! - Transport errors propagated from the HTTP layer
//! - Client-side not-found errors for scoped result polls
//! - Strict JSON decode errors

use thiserror::Error;

/// Result type alias for fcs-aggregator-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for fcs-aggregator-client
///
/// Validation errors (`Config`) are raised synchronously before any network
/// call. Transport and decode errors propagate unmodified; the only
/// interception is the legacy 404 case in
/// [`AggregatorClient::stop_search`](crate::AggregatorClient::stop_search).
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting or argument is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the issue
        message: String,
        /// The configuration key or parameter name that caused the error (e.g., "base_url")
        key: Option<String>,
    },

    /// Network or HTTP status error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A scoped result poll yielded no entry for the requested resource
    #[error("results for resource not found (search: {search_id}, resource: {resource_id})")]
    NotFound {
        /// The search identifier that was polled
        search_id: String,
        /// The resource identifier that had no matching entry
        resource_id: String,
    },

    /// Response body was not valid JSON
    #[error("response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// Build a `Config` error for a missing or empty required parameter
    pub(crate) fn missing_param(name: &str) -> Self {
        Error::Config {
            message: format!("missing required \"{name}\" parameter"),
            key: Some(name.to_string()),
        }
    }
}

/// Validate that a required string parameter is non-empty
///
/// Returns [`Error::Config`] before any request is formed, matching the
/// propagation policy for invalid arguments.
pub(crate) fn require_param(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::missing_param(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_param_accepts_non_empty() {
        assert!(require_param("search_id", "c8a2e5f0").is_ok());
    }

    #[test]
    fn require_param_rejects_empty_and_blank() {
        for value in ["", "   "] {
            let err = require_param("search_id", value).unwrap_err();
            match err {
                Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("search_id")),
                other => panic!("expected Config error, got {other:?}"),
            }
        }
    }
}
