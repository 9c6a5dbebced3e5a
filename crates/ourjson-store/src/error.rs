use ourjson_types::BinId;

/// Errors from bin store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A bin with this id is already stored.
    #[error("bin already exists: {0}")]
    AlreadyExists(BinId),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend is unusable (poisoned lock, unreachable server, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
