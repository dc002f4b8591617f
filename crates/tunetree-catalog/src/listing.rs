//! Single-level listing: the immediate children of one directory.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tunetree_types::{is_audio_file, SEPARATOR, SEPARATOR_STR};

use crate::catalog::Catalog;
use crate::error::CatalogResult;

/// Immediate child directories and audio files of one directory, as names
/// relative to that directory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    pub dirs: Vec<String>,
    pub files: Vec<String>,
}

impl Catalog {
    /// One delimited store call under `path`.
    ///
    /// Child directories are the grouped prefixes with the queried prefix and
    /// the trailing separator removed; names that end up empty are dropped.
    /// Child files are ungrouped keys with the prefix removed, keeping only
    /// true immediate children with an audio extension. Order follows the
    /// store.
    pub async fn list_one_level(&self, path: &str) -> CatalogResult<DirectoryListing> {
        let prefix = self.namespace().directory_key(path);
        let grouped = self
            .guarded(self.store().list_grouped(&prefix, SEPARATOR_STR))
            .await?;

        let dirs: Vec<String> = grouped
            .common_prefixes
            .iter()
            .filter_map(|group| {
                let name = group.strip_prefix(prefix.as_str())?;
                let name = name.strip_suffix(SEPARATOR).unwrap_or(name);
                (!name.is_empty()).then(|| name.to_string())
            })
            .collect();

        let files: Vec<String> = grouped
            .objects
            .iter()
            .filter_map(|obj| {
                let name = obj.key.strip_prefix(prefix.as_str())?;
                let visible = !name.is_empty() && !name.contains(SEPARATOR) && is_audio_file(name);
                visible.then(|| name.to_string())
            })
            .collect();

        debug!(path, dirs = dirs.len(), files = files.len(), "listed one level");
        Ok(DirectoryListing { dirs, files })
    }
}
