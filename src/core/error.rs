//! Error types and error handling for the davsearch service.
//!
//! This module defines the error types used throughout the
//! application. Protocol-level mapping (status codes) happens in
//! the response serializer and the HTTP adapter.

use thiserror::Error;

/// Result type alias for davsearch operations
pub type Result<T> = std::result::Result<T, DavSearchError>;

/// A malformed or incomplete query document.
///
/// The message is reported verbatim to the client in a 400 response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseFailure {
    pub message: String,
}

impl ParseFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure signalled by a search backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend refuses to run the query for this client
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Opaque backend failure, surfaced as diagnostic text
    #[error("{0}")]
    Failed(String),
}

/// Main error type for the davsearch service
#[derive(Error, Debug)]
pub enum DavSearchError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseFailure),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("XML write error: {0}")]
    XmlWrite(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl DavSearchError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a bad request error (invalid client input)
    pub fn is_bad_request(&self) -> bool {
        matches!(self, DavSearchError::Parse(_))
    }

    /// Check if this is an access-denied error
    pub fn is_forbidden(&self) -> bool {
        matches!(self, DavSearchError::Backend(BackendError::Forbidden(_)))
    }
}
