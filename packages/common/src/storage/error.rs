use thiserror::Error;

/// Errors that can occur during object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The object store could not be configured.
    #[error("{0}")]
    Config(String),

    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The backend answered with an unexpected status.
    #[error("object store returned status {status} for {key}")]
    Backend { status: u16, key: String },

    /// The request to the backend failed.
    #[error("object store request failed: {0}")]
    Request(String),
}
