//! Error types for rgw-core
//!
//! Provides a unified error type that can be classified into the four
//! failure kinds of the client and converted to CLI exit codes.

use thiserror::Error;

/// Result type alias for rgw-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for rgw-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Required settings missing or a collaborator could not be provided
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller misuse: unsupported verb, missing resource, bad header
    #[error("Usage error: {0}")]
    Usage(String),

    /// Network-level failure reported by the transport
    #[error("Network error: {0}")]
    Network(String),

    /// The gateway answered with a 4xx or 5xx status
    #[error("HTTP {status}: {body}")]
    Http {
        /// Response status code
        status: http::StatusCode,
        /// Response body, lossily decoded as UTF-8
        body: String,
    },

    /// Response body could not be read
    #[error("Unable to parse response: {0}")]
    ResponseParse(String),

    /// Response body is not valid JSON
    #[error("Unable to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing settings or collaborators
    Configuration,
    /// Rejected before any network call
    Usage,
    /// Network failure or HTTP error status
    Transport,
    /// Response body unreadable or not JSON
    ResponseParse,
}

impl Error {
    /// Classify this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) | Error::Io(_) | Error::TomlParse(_) => ErrorKind::Configuration,
            Error::Usage(_) | Error::InvalidUrl(_) => ErrorKind::Usage,
            Error::Network(_) | Error::Http { .. } => ErrorKind::Transport,
            Error::ResponseParse(_) | Error::Json(_) => ErrorKind::ResponseParse,
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) | Error::InvalidUrl(_) => 2, // UsageError
            Error::Config(_) => 2,                       // UsageError
            Error::Network(_) => 3,                      // NetworkError
            Error::Http { status, .. } => match status.as_u16() {
                401 | 403 => 4, // AuthError
                404 => 5,       // NotFound
                409 => 6,       // Conflict
                500.. => 3,     // NetworkError
                _ => 1,
            },
            _ => 1, // GeneralError
        }
    }
}
