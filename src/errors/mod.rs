//! Error handling module for the IoT lock client.
//!
//! Every failure a caller can see is a `ClientError`. The presentation layer
//! decides how to show it; nothing here talks to the user directly.

use thiserror::Error;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const HTTP_ERROR: &str = "HTTP_ERROR";
    pub const API_ERROR: &str = "API_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const IO_ERROR: &str = "IO_ERROR";
    pub const BUSY: &str = "BUSY";
    pub const NOT_FOUND: &str = "NOT_FOUND";
}

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response
    #[error("NETWORK_ERROR: {0}")]
    Network(String),
    /// The server answered with a non-2xx status
    #[error("HTTP_ERROR: {message} (HTTP {status})")]
    Http { status: u16, message: String },
    /// The server answered 2xx but the body reports a failure
    #[error("API_ERROR: {0}")]
    Api(String),
    /// The response body did not have the expected shape
    #[error("DECODE_ERROR: {0}")]
    Decode(String),
    /// No logged-in user, access token or API key
    #[error("UNAUTHENTICATED: {0}")]
    Unauthenticated(String),
    /// Client-side field checks failed before any request was made
    #[error("VALIDATION_ERROR: {0}")]
    Validation(String),
    /// Local session storage failed
    #[error("STORAGE_ERROR: {0}")]
    Storage(String),
    /// A local file could not be read
    #[error("IO_ERROR: {0}")]
    Io(String),
    /// The same action is already in flight
    #[error("BUSY: {0}")]
    Busy(String),
    /// Visit not present in the local list
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
}

impl ClientError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(_) => codes::NETWORK_ERROR,
            ClientError::Http { .. } => codes::HTTP_ERROR,
            ClientError::Api(_) => codes::API_ERROR,
            ClientError::Decode(_) => codes::DECODE_ERROR,
            ClientError::Unauthenticated(_) => codes::UNAUTHENTICATED,
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::Storage(_) => codes::STORAGE_ERROR,
            ClientError::Io(_) => codes::IO_ERROR,
            ClientError::Busy(_) => codes::BUSY,
            ClientError::NotFound(_) => codes::NOT_FOUND,
        }
    }

    /// Get the user-facing message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Http { message, .. } => message.clone(),
            ClientError::Network(msg)
            | ClientError::Api(msg)
            | ClientError::Decode(msg)
            | ClientError::Unauthenticated(msg)
            | ClientError::Validation(msg)
            | ClientError::Storage(msg)
            | ClientError::Io(msg)
            | ClientError::Busy(msg)
            | ClientError::NotFound(msg) => msg.clone(),
        }
    }

    /// HTTP status carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("HTTP client error: {:?}", err);
        if err.is_decode() {
            ClientError::Decode(format!("Invalid response body: {}", err))
        } else {
            ClientError::Network(format!("Network error: {}", err))
        }
    }
}

impl From<sqlx::Error> for ClientError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        ClientError::Storage(format!("Storage error: {}", err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ClientError::Decode(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("IO error: {:?}", err);
        ClientError::Io(format!("Could not read file: {}", err))
    }
}
