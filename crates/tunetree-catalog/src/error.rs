//! Error types for catalog operations.

use tunetree_store::StoreError;

/// Errors that can occur while browsing, searching or aggregating.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// An underlying store call failed. Partial results are discarded.
    #[error(transparent)]
    StoreUnavailable(StoreError),

    /// The trimmed search query is shorter than the minimum.
    #[error("search query must have at least {min} character(s)")]
    QueryTooShort { min: usize },

    /// The folder selection could not be decoded as a list of strings.
    #[error("invalid request payload: {0}")]
    InvalidRequestPayload(String),

    /// Listing a single directory level failed.
    #[error("cannot access directory {path:?}: {source}")]
    DirectoryAccess {
        path: String,
        #[source]
        source: StoreError,
    },

    /// The requested file does not exist.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// The request named a function the catalog does not provide.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// The caller cancelled the request before it finished.
    #[error("request cancelled")]
    Cancelled,
}

/// Convenience alias for catalog results.
pub type CatalogResult<T> = Result<T, CatalogError>;
