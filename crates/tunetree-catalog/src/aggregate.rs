//! Union of the audio files under several selected folders.
//!
//! This is the one partial-success operation: a folder whose enumeration
//! fails is logged and skipped, and the files found under the remaining
//! folders are still returned. Cancellation is not swallowed.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};

/// Decode a folder selection serialized as a JSON array of strings.
pub fn parse_folder_selection(payload: &str) -> CatalogResult<Vec<String>> {
    serde_json::from_str(payload).map_err(|e| CatalogError::InvalidRequestPayload(e.to_string()))
}

impl Catalog {
    /// Deduplicated, sorted audio files under every folder in `folders`.
    ///
    /// Folders are enumerated one after another, in input order.
    pub async fn aggregate_files_in(&self, folders: &[String]) -> CatalogResult<Vec<String>> {
        let mut unique = BTreeSet::new();
        let mut skipped = 0usize;

        for folder in folders {
            match self.enumerate_audio_files(folder).await {
                Ok(files) => unique.extend(files),
                Err(CatalogError::Cancelled) => return Err(CatalogError::Cancelled),
                Err(err) => {
                    skipped += 1;
                    warn!(folder = %folder, error = %err, "skipping folder in aggregation");
                }
            }
        }

        debug!(
            folders = folders.len(),
            skipped,
            files = unique.len(),
            "aggregated folders"
        );
        Ok(unique.into_iter().collect())
    }

    /// [`Self::aggregate_files_in`] over a serialized folder list.
    ///
    /// A malformed payload fails with [`CatalogError::InvalidRequestPayload`]
    /// before the store is touched.
    pub async fn aggregate_files_json(&self, payload: &str) -> CatalogResult<Vec<String>> {
        let folders = parse_folder_selection(payload)?;
        self.aggregate_files_in(&folders).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog_over, sample_catalog};
    use tokio_util::sync::CancellationToken;

    fn folders(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_valid_selection() {
        assert_eq!(
            parse_folder_selection(r#"["jazz", "rock/70s"]"#).unwrap(),
            vec!["jazz", "rock/70s"]
        );
        assert!(parse_folder_selection("[]").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_non_list() {
        for bad in ["", "jazz", r#"{"a":1}"#, "[1, 2]", r#"["ok", null]"#, "[\"x\""] {
            assert!(
                matches!(
                    parse_folder_selection(bad),
                    Err(CatalogError::InvalidRequestPayload(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn aggregate_two_folders() {
        let (_, catalog) = sample_catalog();
        assert_eq!(
            catalog
                .aggregate_files_in(&folders(&["jazz", "rock"]))
                .await
                .unwrap(),
            vec!["jazz/coltrane.wav", "jazz/miles.mp3", "rock/ac.mp3"]
        );
    }

    #[tokio::test]
    async fn overlapping_folders_are_deduplicated() {
        let (_, catalog) = catalog_over([
            "root/jazz/bebop/bird.ogg",
            "root/jazz/miles.mp3",
        ]);
        let files = catalog
            .aggregate_files_in(&folders(&["jazz", "jazz/bebop", "jazz"]))
            .await
            .unwrap();
        assert_eq!(files, vec!["jazz/bebop/bird.ogg", "jazz/miles.mp3"]);
    }

    #[tokio::test]
    async fn failing_folder_is_skipped() {
        let (store, catalog) = sample_catalog();
        store.fail_prefix("root/rock/");
        let files = catalog
            .aggregate_files_in(&folders(&["rock", "jazz"]))
            .await
            .unwrap();
        assert_eq!(files, vec!["jazz/coltrane.wav", "jazz/miles.mp3"]);
    }

    #[tokio::test]
    async fn all_folders_failing_is_empty_success() {
        let (store, catalog) = sample_catalog();
        store.fail_prefix("root/");
        let files = catalog
            .aggregate_files_in(&folders(&["rock", "jazz"]))
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn empty_selection() {
        let (store, catalog) = sample_catalog();
        assert!(catalog.aggregate_files_in(&[]).await.unwrap().is_empty());
        assert_eq!(store.flat_pages(), 0);
    }

    #[tokio::test]
    async fn malformed_payload_never_touches_store() {
        let (store, catalog) = sample_catalog();
        let err = catalog.aggregate_files_json("not json").await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRequestPayload(_)));
        assert_eq!(store.flat_pages(), 0);
    }

    #[tokio::test]
    async fn json_payload_aggregates() {
        let (_, catalog) = sample_catalog();
        assert_eq!(
            catalog.aggregate_files_json(r#"["rock"]"#).await.unwrap(),
            vec!["rock/ac.mp3"]
        );
    }

    #[tokio::test]
    async fn cancellation_is_not_swallowed() {
        let (_, catalog) = sample_catalog();
        let token = CancellationToken::new();
        token.cancel();
        let err = catalog
            .with_cancellation(token)
            .aggregate_files_in(&folders(&["jazz"]))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Cancelled));
    }
}
