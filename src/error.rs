//! Error types for the SIA command line tool.
//!
//! Every error is terminal for the operation that raised it: there is no retry,
//! no partial submission and no rollback of already-streamed parts.

use thiserror::Error;

/// Errors surfaced by definition handling, payload building and the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The home directory or working directory could not be determined.
    #[error("Failed to resolve path '{path}': {reason}")]
    PathResolution { path: String, reason: String },

    /// Structured <-> text encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A staged file is missing or cannot be opened at push time.
    #[error("Failed to open file {path}: {source}")]
    FileNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading a staged file into the request body failed.
    #[error("Failed to copy file data for {path}: {source}")]
    CopyError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The server answered with a non-2xx status. `detail` is shown verbatim.
    #[error("{detail}")]
    ServerRejected { status: u16, detail: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to execute HTTP request: {0}")]
    Transport(String),

    #[error("Login required. Use 'sia login'")]
    LoginRequired,

    #[error("Invalid agent definition: {0}")]
    InvalidDefinition(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for ApiError {
    fn from(err: serde_yaml::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
