use async_trait::async_trait;

use crate::error::StoreResult;
use crate::object::{GroupedListing, ObjectBody, ObjectStream};

/// Read-only view of a prefix-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Keys are opaque strings; "directories" exist only as shared prefixes.
/// - Listings reflect the store's current state. Nothing is cached.
/// - Every failure is surfaced as an error. Implementations never retry on
///   the caller's behalf.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List one level under `prefix`, grouping deeper keys by `delimiter`.
    ///
    /// Implementations gather every page into one logical result.
    async fn list_grouped(&self, prefix: &str, delimiter: &str) -> StoreResult<GroupedListing>;

    /// List every object under `prefix`, without grouping.
    ///
    /// Pages are fetched as the stream is polled. Dropping the stream stops
    /// pagination. An error item ends the stream.
    fn list_flat<'a>(&'a self, prefix: &'a str) -> ObjectStream<'a>;

    /// Open a single object for reading.
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) if the
    /// key does not exist.
    async fn get_object(&self, key: &str) -> StoreResult<ObjectBody>;
}
