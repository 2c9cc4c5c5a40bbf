//! Client error types.

use std::path::PathBuf;
use thiserror::Error;

/// Token cache failure.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No cached token and no credential file to issue one with.
    #[error("Not configured: no cached token and no credential file")]
    NotConfigured,

    #[error("Home directory could not be determined")]
    HomeDirectoryUnavailable,

    /// The issuer rejected the credential.
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Issuer unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Invalid credential file: {0}")]
    InvalidCredential(String),

    #[error("Invalid config file: {0}")]
    InvalidConfig(String),

    #[error("Invalid issuer response: {0}")]
    InvalidResponse(String),

    #[error("I/O failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Wrapups API client failure.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The service refused a freshly issued token.
    #[error("Unauthenticated: the service refused a freshly issued token")]
    Unauthenticated,

    #[error("Request failed with status {status}: {code}: {message}")]
    RequestFailed {
        status: u16,
        code: String,
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid service response: {0}")]
    InvalidResponse(String),
}
