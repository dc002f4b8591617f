//! Shared fixtures for catalog tests.

use std::sync::Arc;

use bytes::Bytes;
use tunetree_store::InMemoryObjectStore;
use tunetree_types::Namespace;

use crate::catalog::Catalog;

/// Root prefix used by every fixture.
pub(crate) const ROOT: &str = "root";

pub(crate) fn paged_catalog_over<I, K>(
    page_size: usize,
    keys: I,
) -> (Arc<InMemoryObjectStore>, Catalog)
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    let store = Arc::new(InMemoryObjectStore::with_page_size(page_size));
    for key in keys {
        store.put(key, Bytes::new());
    }
    let catalog = Catalog::new(store.clone(), Namespace::new(ROOT));
    (store, catalog)
}

pub(crate) fn catalog_over<I, K>(keys: I) -> (Arc<InMemoryObjectStore>, Catalog)
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    paged_catalog_over(tunetree_store::memory::DEFAULT_PAGE_SIZE, keys)
}

/// The reference tree: two genres, one non-audio file.
pub(crate) fn sample_catalog() -> (Arc<InMemoryObjectStore>, Catalog) {
    catalog_over([
        "root/jazz/miles.mp3",
        "root/jazz/coltrane.wav",
        "root/rock/ac.mp3",
        "root/jazz/notes.txt",
    ])
}
