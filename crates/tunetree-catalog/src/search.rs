//! Case-insensitive substring search over file and directory names.
//!
//! Matching runs over paths relative to the tree root. At most
//! [`MAX_SEARCH_RESULTS`] matches are kept, taken in enumeration order, and
//! only then sorted.

use tracing::debug;

use tunetree_types::{MAX_SEARCH_RESULTS, MIN_SEARCH_LEN, SEPARATOR};

use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};

/// A trimmed, lower-cased search needle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    /// Trim and lower-case `raw`, rejecting it if fewer than
    /// [`MIN_SEARCH_LEN`] characters remain.
    pub fn parse(raw: &str) -> CatalogResult<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < MIN_SEARCH_LEN {
            return Err(CatalogError::QueryTooShort {
                min: MIN_SEARCH_LEN,
            });
        }
        Ok(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Returns `true` if `candidate` contains the needle, ignoring case.
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.to_lowercase().contains(&self.needle)
    }
}

impl Catalog {
    /// Audio files whose path contains `query`, sorted.
    ///
    /// The whole file listing is read so that a failure on any page fails the
    /// search; matches past the result cap are dropped as they arrive, which
    /// keeps the first matches in store order.
    pub async fn search_titles(&self, query: &str) -> CatalogResult<Vec<String>> {
        let query = SearchQuery::parse(query)?;
        let mut matches = Vec::new();
        self.scan_audio_files("", |file| {
            if matches.len() < MAX_SEARCH_RESULTS && query.matches(&file) {
                matches.push(file);
            }
        })
        .await?;

        matches.sort();
        debug!(needle = query.needle(), count = matches.len(), "searched titles");
        Ok(matches)
    }

    /// Directories whose path contains `query`, each with a trailing
    /// separator, sorted.
    pub async fn search_dirs(&self, query: &str) -> CatalogResult<Vec<String>> {
        let query = SearchQuery::parse(query)?;
        let mut matches: Vec<String> = self
            .enumerate_directories()
            .await?
            .into_iter()
            .filter(|dir| query.matches(dir))
            .take(MAX_SEARCH_RESULTS)
            .map(|mut dir| {
                dir.push(SEPARATOR);
                dir
            })
            .collect();

        matches.sort();
        debug!(needle = query.needle(), count = matches.len(), "searched directories");
        Ok(matches)
    }
}
