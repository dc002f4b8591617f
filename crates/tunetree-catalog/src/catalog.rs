//! The [`Catalog`] handle and the operations it exposes to callers.
//!
//! A catalog is a store handle plus a [`Namespace`]. It holds no listing
//! state: every call recomputes its result from the store's current contents.
//! Cloning is cheap, and [`Catalog::with_cancellation`] derives a
//! request-scoped handle whose store calls stop as soon as the token fires.

use std::future::Future;
use std::sync::Arc;

use futures::{Stream, TryStreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use tunetree_store::{ObjectBody, ObjectStore, StoreResult};
use tunetree_types::{Namespace, SEPARATOR};

use crate::error::{CatalogError, CatalogResult};
use crate::listing::DirectoryListing;
use crate::request::CatalogRequest;
use crate::response::{CatalogResponse, Payload};

/// Virtual directory tree over a prefix-addressed object store.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn ObjectStore>,
    namespace: Namespace,
    cancel: CancellationToken,
}

impl Catalog {
    /// Create a catalog over `store`, scoped to `namespace`.
    pub fn new(store: Arc<dyn ObjectStore>, namespace: Namespace) -> Self {
        Self {
            store,
            namespace,
            cancel: CancellationToken::new(),
        }
    }

    /// A handle sharing this catalog's store whose store calls are abandoned
    /// once `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            store: Arc::clone(&self.store),
            namespace: self.namespace.clone(),
            cancel: token,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub(crate) fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Run one store call, racing it against the cancellation token.
    pub(crate) async fn guarded<T>(
        &self,
        call: impl Future<Output = StoreResult<T>>,
    ) -> CatalogResult<T> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(CatalogError::Cancelled),
            result = call => result.map_err(CatalogError::StoreUnavailable),
        }
    }

    /// Pull the next item from a store stream under the cancellation token.
    pub(crate) async fn next_guarded<S, T>(&self, stream: &mut S) -> CatalogResult<Option<T>>
    where
        S: Stream<Item = StoreResult<T>> + Unpin,
    {
        self.guarded(stream.try_next()).await
    }

    // ---------------------------------------------------------------
    // Calling boundary
    // ---------------------------------------------------------------

    /// List one directory level, both lists sorted.
    ///
    /// Any store failure is reported as [`CatalogError::DirectoryAccess`]
    /// carrying `path`.
    pub async fn browse(&self, path: &str) -> CatalogResult<DirectoryListing> {
        let mut listing = self.list_one_level(path).await.map_err(|err| match err {
            CatalogError::StoreUnavailable(source) => CatalogError::DirectoryAccess {
                path: path.to_string(),
                source,
            },
            other => other,
        })?;
        listing.dirs.sort();
        listing.files.sort();
        Ok(listing)
    }

    /// Every audio file in the tree, sorted.
    pub async fn all_audio_files(&self) -> CatalogResult<Vec<String>> {
        self.all_audio_files_under("").await
    }

    /// Every audio file under `path`, sorted.
    pub async fn all_audio_files_under(&self, path: &str) -> CatalogResult<Vec<String>> {
        let mut files = self.enumerate_audio_files(path).await?;
        files.sort();
        Ok(files)
    }

    /// Every directory in the tree. The root (`""`) comes first; the rest are
    /// sorted.
    pub async fn all_directories(&self) -> CatalogResult<Vec<String>> {
        let mut dirs = self.enumerate_directories().await?;
        if let Some(rest) = dirs.get_mut(1..) {
            rest.sort();
        }
        Ok(dirs)
    }

    /// Open one file for streaming.
    pub async fn open_audio(&self, path: &str) -> CatalogResult<ObjectBody> {
        let path = path.trim_start_matches(SEPARATOR);
        let key = self.namespace.to_store_key(path);
        debug!(path, key = %key, "opening object");
        self.guarded(self.store.get_object(&key))
            .await
            .map_err(|err| match err {
                CatalogError::StoreUnavailable(source) if source.is_not_found() => {
                    CatalogError::FileNotFound(path.to_string())
                }
                other => other,
            })
    }

    /// Execute a decoded request and project the outcome into a response.
    pub async fn dispatch(&self, request: &CatalogRequest) -> CatalogResponse {
        let callback = request.callback();
        let result = match request {
            CatalogRequest::Browse { path } => self.browse(path).await.map(|listing| {
                Payload::Listing {
                    path: path.clone(),
                    dirs: listing.dirs,
                    files: listing.files,
                }
            }),
            CatalogRequest::SearchTitles { query } => {
                self.search_titles(query).await.map(Payload::Titles)
            }
            CatalogRequest::SearchDirs { query } => {
                self.search_dirs(query).await.map(Payload::Directories)
            }
            CatalogRequest::AllAudioFiles => self.all_audio_files().await.map(Payload::Files),
            CatalogRequest::AllAudioFilesUnder { path } => {
                self.all_audio_files_under(path).await.map(Payload::Files)
            }
            CatalogRequest::AggregateFiles { payload } => {
                self.aggregate_files_json(payload).await.map(Payload::Files)
            }
            CatalogRequest::AllDirectories => {
                self.all_directories().await.map(Payload::Directories)
            }
            CatalogRequest::Unknown { function } => {
                Err(CatalogError::UnknownFunction(function.clone()))
            }
        };

        match result {
            Ok(payload) => CatalogResponse::ok(callback, payload),
            Err(err) => {
                warn!(function = request.function_name(), error = %err, "catalog request failed");
                CatalogResponse::failure(callback, &err)
            }
        }
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("namespace", &self.namespace)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
