//! Error types shared by the wizard core

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`](crate::storage::KeyValueStore) backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised by the HTTP collaborators (token endpoint, page, submit endpoint)
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("unreadable response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("invalid transport configuration: {0}")]
    Config(String),
}

/// Errors surfaced by wizard operations that touch I/O
#[derive(Debug, Error)]
pub enum WizardError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Result alias for wizard operations
pub type WizardResult<T> = Result<T, WizardError>;
