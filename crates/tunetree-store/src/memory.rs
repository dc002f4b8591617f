use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_stream::try_stream;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

use crate::error::{StoreError, StoreResult};
use crate::object::{GroupedListing, ObjectBody, ObjectStream, ObjectSummary};
use crate::traits::ObjectStore;

/// Default number of keys returned per flat-listing page (matches S3).
pub const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Clone, Debug)]
struct MemoryObject {
    data: Bytes,
    content_type: Option<String>,
}

/// In-memory, `BTreeMap`-based object store.
///
/// Intended for tests and embedding. Keys are kept in lexicographic order,
/// the same order S3 lists them in. Flat listings are served in pages sized
/// by [`Self::with_page_size`], fetched lazily as the stream is polled.
///
/// Failures can be injected per prefix ([`Self::fail_prefix`]) or on the Nth
/// flat-listing page ([`Self::fail_flat_page`]).
pub struct InMemoryObjectStore {
    objects: RwLock<BTreeMap<String, MemoryObject>>,
    failing_prefixes: RwLock<Vec<String>>,
    page_size: usize,
    fail_on_page: AtomicUsize,
    grouped_calls: AtomicUsize,
    flat_pages: AtomicUsize,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Create an empty store that serves flat listings `page_size` keys at a
    /// time. A page size of zero is treated as one.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            failing_prefixes: RwLock::new(Vec::new()),
            page_size: page_size.max(1),
            fail_on_page: AtomicUsize::new(0),
            grouped_calls: AtomicUsize::new(0),
            flat_pages: AtomicUsize::new(0),
        }
    }

    /// Build a store holding an empty object for each key.
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let store = Self::new();
        for key in keys {
            store.put(key, Bytes::new());
        }
        store
    }

    /// Insert or replace an object.
    pub fn put(&self, key: impl Into<String>, data: impl Into<Bytes>) {
        self.insert(key.into(), data.into(), None);
    }

    /// Insert or replace an object with an explicit content type.
    pub fn put_with_type(
        &self,
        key: impl Into<String>,
        data: impl Into<Bytes>,
        content_type: impl Into<String>,
    ) {
        self.insert(key.into(), data.into(), Some(content_type.into()));
    }

    fn insert(&self, key: String, data: Bytes, content_type: Option<String>) {
        self.objects
            .write()
            .expect("lock poisoned")
            .insert(key, MemoryObject { data, content_type });
    }

    /// Make every call whose prefix (or key) starts with `prefix` fail with
    /// [`StoreError::Unavailable`].
    pub fn fail_prefix(&self, prefix: impl Into<String>) {
        self.failing_prefixes
            .write()
            .expect("lock poisoned")
            .push(prefix.into());
    }

    /// Fail the `n`th flat-listing page fetched from this store (1-based,
    /// counted across all flat listings). Zero disables the failure.
    pub fn fail_flat_page(&self, n: usize) {
        self.fail_on_page.store(n, Ordering::SeqCst);
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.failing_prefixes.write().expect("lock poisoned").clear();
        self.fail_on_page.store(0, Ordering::SeqCst);
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Number of `list_grouped` calls served so far.
    pub fn grouped_calls(&self) -> usize {
        self.grouped_calls.load(Ordering::SeqCst)
    }

    /// Number of flat-listing pages fetched so far.
    pub fn flat_pages(&self) -> usize {
        self.flat_pages.load(Ordering::SeqCst)
    }

    fn check_failure(&self, prefix: &str) -> StoreResult<()> {
        let failing = self.failing_prefixes.read().expect("lock poisoned");
        match failing.iter().find(|p| prefix.starts_with(p.as_str())) {
            Some(p) => Err(StoreError::Unavailable(format!(
                "injected failure for prefix {p:?}"
            ))),
            None => Ok(()),
        }
    }

    fn flat_page(&self, prefix: &str, after: Option<&str>) -> StoreResult<Vec<ObjectSummary>> {
        let page_no = self.flat_pages.fetch_add(1, Ordering::SeqCst) + 1;
        self.check_failure(prefix)?;
        let fail_on = self.fail_on_page.load(Ordering::SeqCst);
        if fail_on != 0 && page_no == fail_on {
            return Err(StoreError::Unavailable(format!(
                "injected failure on page {page_no}"
            )));
        }

        let start = match after {
            Some(key) => Bound::Excluded(key),
            None => Bound::Included(prefix),
        };
        let map = self.objects.read().expect("lock poisoned");
        Ok(map
            .range::<str, _>((start, Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .take(self.page_size)
            .map(|(key, obj)| summarize(key, obj))
            .collect())
    }
}

fn summarize(key: &str, obj: &MemoryObject) -> ObjectSummary {
    ObjectSummary {
        key: key.to_string(),
        size: obj.data.len() as u64,
        content_type: obj.content_type.clone(),
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list_grouped(&self, prefix: &str, delimiter: &str) -> StoreResult<GroupedListing> {
        self.grouped_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(prefix)?;

        let map = self.objects.read().expect("lock poisoned");
        let mut listing = GroupedListing::default();
        let under_prefix = map
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix));

        for (key, obj) in under_prefix {
            let rest = &key[prefix.len()..];
            let group = if delimiter.is_empty() {
                None
            } else {
                rest.find(delimiter)
            };
            match group {
                Some(idx) => {
                    let common = &key[..prefix.len() + idx + delimiter.len()];
                    if listing.common_prefixes.last().map(String::as_str) != Some(common) {
                        listing.common_prefixes.push(common.to_string());
                    }
                }
                None => listing.objects.push(summarize(key, obj)),
            }
        }
        Ok(listing)
    }

    fn list_flat<'a>(&'a self, prefix: &'a str) -> ObjectStream<'a> {
        Box::pin(try_stream! {
            let mut after: Option<String> = None;
            loop {
                let page = self.flat_page(prefix, after.as_deref())?;
                let full = page.len() == self.page_size;
                after = page.last().map(|obj| obj.key.clone());
                for obj in page {
                    yield obj;
                }
                if !full {
                    break;
                }
            }
        })
    }

    async fn get_object(&self, key: &str) -> StoreResult<ObjectBody> {
        self.check_failure(key)?;
        let obj = self
            .objects
            .read()
            .expect("lock poisoned")
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        let length = obj.data.len() as u64;
        let data = obj.data;
        Ok(ObjectBody {
            body: futures::stream::once(async move { Ok(data) }).boxed(),
            length,
            content_type: obj.content_type,
        })
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .field("page_size", &self.page_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    fn sample() -> InMemoryObjectStore {
        InMemoryObjectStore::from_keys([
            "root/jazz/miles.mp3",
            "root/jazz/coltrane.wav",
            "root/jazz/bebop/bird.ogg",
            "root/rock/ac.mp3",
            "root/readme.txt",
        ])
    }

    async fn flat_keys(store: &InMemoryObjectStore, prefix: &str) -> StoreResult<Vec<String>> {
        store
            .list_flat(prefix)
            .map_ok(|obj| obj.key)
            .try_collect()
            .await
    }

    // -----------------------------------------------------------------------
    // Grouped listing
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn grouped_listing_at_root() {
        let store = sample();
        let listing = store.list_grouped("root/", "/").await.unwrap();
        assert_eq!(listing.common_prefixes, vec!["root/jazz/", "root/rock/"]);
        let keys: Vec<_> = listing.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["root/readme.txt"]);
    }

    #[tokio::test]
    async fn grouped_listing_nested() {
        let store = sample();
        let listing = store.list_grouped("root/jazz/", "/").await.unwrap();
        assert_eq!(listing.common_prefixes, vec!["root/jazz/bebop/"]);
        let keys: Vec<_> = listing.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["root/jazz/coltrane.wav", "root/jazz/miles.mp3"]);
    }

    #[tokio::test]
    async fn grouped_listing_without_delimiter_is_flat() {
        let store = sample();
        let listing = store.list_grouped("root/jazz/", "").await.unwrap();
        assert!(listing.common_prefixes.is_empty());
        assert_eq!(listing.objects.len(), 3);
    }

    #[tokio::test]
    async fn grouped_listing_counts_calls() {
        let store = sample();
        store.list_grouped("root/", "/").await.unwrap();
        store.list_grouped("root/jazz/", "/").await.unwrap();
        assert_eq!(store.grouped_calls(), 2);
    }

    // -----------------------------------------------------------------------
    // Flat listing and pagination
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn flat_listing_returns_all_under_prefix() {
        let store = sample();
        let keys = flat_keys(&store, "root/jazz/").await.unwrap();
        assert_eq!(
            keys,
            vec![
                "root/jazz/bebop/bird.ogg",
                "root/jazz/coltrane.wav",
                "root/jazz/miles.mp3",
            ]
        );
    }

    #[tokio::test]
    async fn flat_listing_paginates() {
        let store = InMemoryObjectStore::with_page_size(2);
        for i in 0..5 {
            store.put(format!("p/{i}.mp3"), Bytes::new());
        }
        let keys = flat_keys(&store, "p/").await.unwrap();
        assert_eq!(keys.len(), 5);
        // 2 + 2 + 1
        assert_eq!(store.flat_pages(), 3);
    }

    #[tokio::test]
    async fn flat_listing_exact_multiple_fetches_trailing_empty_page() {
        let store = InMemoryObjectStore::with_page_size(2);
        for i in 0..4 {
            store.put(format!("p/{i}.mp3"), Bytes::new());
        }
        assert_eq!(flat_keys(&store, "p/").await.unwrap().len(), 4);
        assert_eq!(store.flat_pages(), 3);
    }

    #[tokio::test]
    async fn flat_listing_is_lazy() {
        let store = InMemoryObjectStore::with_page_size(2);
        for i in 0..10 {
            store.put(format!("p/{i}.mp3"), Bytes::new());
        }
        let mut stream = store.list_flat("p/");
        stream.try_next().await.unwrap();
        drop(stream);
        assert_eq!(store.flat_pages(), 1);
    }

    #[tokio::test]
    async fn failing_page_ends_stream_with_error() {
        let store = InMemoryObjectStore::with_page_size(1);
        store.put("p/a.mp3", Bytes::new());
        store.put("p/b.mp3", Bytes::new());
        store.fail_flat_page(2);
        let err = flat_keys(&store, "p/").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    // -----------------------------------------------------------------------
    // Failure injection
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn failing_prefix_affects_only_matching_calls() {
        let store = sample();
        store.fail_prefix("root/rock/");
        assert!(store.list_grouped("root/rock/", "/").await.is_err());
        assert!(flat_keys(&store, "root/rock/").await.is_err());
        assert!(store.list_grouped("root/jazz/", "/").await.is_ok());

        store.clear_failures();
        assert!(store.list_grouped("root/rock/", "/").await.is_ok());
    }

    // -----------------------------------------------------------------------
    // Object reads
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn get_object_returns_bytes_and_type() {
        let store = InMemoryObjectStore::new();
        store.put_with_type("a.mp3", &b"ID3data"[..], "audio/mpeg");
        let obj = store.get_object("a.mp3").await.unwrap();
        assert_eq!(obj.length, 7);
        assert_eq!(obj.content_type_or_default(), "audio/mpeg");
        let chunks: Vec<Bytes> = obj.body.try_collect().await.unwrap();
        assert_eq!(chunks.concat(), b"ID3data");
    }

    #[tokio::test]
    async fn get_missing_object() {
        let store = InMemoryObjectStore::new();
        let err = store.get_object("nope.mp3").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn debug_format() {
        let store = sample();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryObjectStore"));
        assert!(debug.contains("object_count: 5"));
    }
}
