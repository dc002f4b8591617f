//! Bounds applied to search queries and results.

/// Minimum number of characters a trimmed search query must have.
pub const MIN_SEARCH_LEN: usize = 1;

/// Maximum number of entries a search returns.
pub const MAX_SEARCH_RESULTS: usize = 100;
