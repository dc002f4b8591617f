use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// One object as reported by a listing call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    /// Full store key, including any root prefix.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// MIME type, when the listing reports one.
    pub content_type: Option<String>,
}

/// Result of a delimited listing: one directory level under a prefix.
///
/// `common_prefixes` are full keys up to and including the next delimiter
/// (e.g. `"music/jazz/"` for prefix `"music/"`). `objects` are the keys with
/// no delimiter after the prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupedListing {
    pub common_prefixes: Vec<String>,
    pub objects: Vec<ObjectSummary>,
}

/// Lazily paginated sequence of listed objects.
pub type ObjectStream<'a> = BoxStream<'a, StoreResult<ObjectSummary>>;

/// Streamed object content.
pub type ByteChunks = BoxStream<'static, StoreResult<Bytes>>;

/// An object opened for reading.
pub struct ObjectBody {
    /// Content, delivered in chunks.
    pub body: ByteChunks,
    /// Total length in bytes.
    pub length: u64,
    /// MIME type reported by the store.
    pub content_type: Option<String>,
}

impl ObjectBody {
    /// Content type, falling back to `application/octet-stream`.
    pub fn content_type_or_default(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or("application/octet-stream")
    }
}

impl std::fmt::Debug for ObjectBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectBody")
            .field("length", &self.length)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}
