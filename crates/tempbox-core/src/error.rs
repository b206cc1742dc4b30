//! Error types for the core pipeline.
//!
//! Per-row MIME decode failures are deliberately absent here: they are
//! absorbed inside the decoder and never propagate.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Required endpoint or credential missing; raised before any I/O.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network failure or non-success HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON decoding of a response body failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A mail id was not found in the loaded page.
    #[error("Mail {0} not found")]
    MailNotFound(u64),
}

impl Error {
    /// Whether this is a configuration error (never retried, surfaced
    /// before any network attempt).
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
