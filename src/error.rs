//! Error types for the bookshelf client

use thiserror::Error;

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures raised below the orchestration layer.
///
/// Non-2xx responses are not errors here: the resource client hands the
/// raw response back and the caller decides what the status means.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Credential cannot be sent as a header")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),
}
