// src/error.rs

//! Unified error handling for the relay application.

use thiserror::Error;

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Failure modes of a single upstream fetch.
///
/// A fetch failure is always scoped to one identity; the dispatcher
/// records it and continues with the next source.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Upstream responded with a non-200 status
    #[error("upstream returned HTTP {0}")]
    HttpStatus(u16),

    /// Feed parsed cleanly but contained zero entries
    #[error("feed contains no entries")]
    NoEntries,

    /// Every mirror in the active pool was tried and failed
    #[error("all mirror instances failed")]
    AllInstancesFailed,

    /// Rendered HTML was missing the post text or permalink
    #[error("post container missing text or permalink")]
    IncompleteExtraction,

    /// Network or parse failure, original message preserved
    #[error("fetch failed: {0}")]
    Exception(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Exception(e.to_string())
    }
}
