//! Error types for audit operations.
//!
//! This module provides the main error type [`AuditError`] which wraps the
//! failures that can occur while talking to the platform or touching the
//! local filesystem. No variant is recovered locally: every error aborts the
//! remaining audit.

use std::io;

use thiserror::Error;

/// The main error type for audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Authentication as `{user}` failed: {reason}")]
    Auth { user: String, reason: String },

    #[error("Object not found: {uri}")]
    NotFound { uri: String },

    #[error("Request for {uri} failed with HTTP status {status}")]
    Status { uri: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response from {uri}: {source}")]
    Decode {
        uri: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuditError {
    /// Create a new `Decode` error for the given resource.
    pub fn new_decode_error(uri: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            uri: uri.into(),
            source,
        }
    }
}
