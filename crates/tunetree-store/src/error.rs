/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or refused the request (network,
    /// permissions, throttling). Not distinguished further.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The requested object does not exist.
    #[error("object not found: {0}")]
    NotFound(String),

    /// I/O error while streaming object bytes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` if this is a missing-object error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
