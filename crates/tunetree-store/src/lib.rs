//! Object-store boundary for tunetree.
//!
//! The catalog never talks to a storage service directly. It goes through the
//! [`ObjectStore`] trait, which exposes exactly three capabilities:
//!
//! - [`ObjectStore::list_grouped`] -- one directory level (prefix + delimiter)
//! - [`ObjectStore::list_flat`] -- every key under a prefix, lazily paginated
//! - [`ObjectStore::get_object`] -- bytes, length and content type of one key
//!
//! # Storage Backends
//!
//! - [`S3ObjectStore`] -- Amazon S3 (or any S3-compatible endpoint)
//! - [`InMemoryObjectStore`] -- `BTreeMap`-backed store for tests and demos,
//!   with page-size simulation and failure injection

pub mod error;
pub mod memory;
pub mod object;
pub mod s3;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectStore;
pub use object::{ByteChunks, GroupedListing, ObjectBody, ObjectStream, ObjectSummary};
pub use s3::{S3Config, S3ObjectStore};
pub use traits::ObjectStore;
