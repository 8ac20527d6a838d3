//! Errors raised by document store and object storage backends

/// Result type for backend operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while talking to a backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document store rejected or failed a request
    #[error("Document store error: {0}")]
    Document(String),
    /// The object storage rejected or failed a request
    #[error("Object storage error: {0}")]
    ObjectStorage(String),
    /// The requested document does not exist
    #[error("Not found: {0}")]
    NotFound(String),
    /// The backend refused the credentials in use
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// A document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
