//! Error types for dataset fetching.

use thiserror::Error;

pub type FetchResult<T> = Result<T, FetchError>;

#[derive(Error, Debug)]
pub enum FetchError {
    /// The name is not in the registry.
    #[error("Dataset not in registry: {0}")]
    UnknownDataset(String),

    /// A registry hash string could not be parsed.
    #[error("Invalid hash '{0}'")]
    InvalidHash(String),

    /// Downloaded content does not match the registry hash.
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// Connection failure or non-success HTTP status.
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
