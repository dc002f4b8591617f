//! Virtual hierarchy engine for tunetree.
//!
//! Presents a flat, prefix-addressed object store as a navigable directory
//! tree of audio files. Directories are never stored; they are inferred from
//! shared key prefixes on every call.
//!
//! # Operations
//!
//! - [`Catalog::browse`] -- one directory level, sorted
//! - [`Catalog::all_directories`] / [`Catalog::all_audio_files_under`] -- full
//!   recursive enumeration
//! - [`Catalog::search_titles`] / [`Catalog::search_dirs`] -- bounded
//!   case-insensitive substring search
//! - [`Catalog::aggregate_files_in`] -- deduplicated union over several
//!   folders, tolerant of per-folder failures
//! - [`Catalog::dispatch`] -- decoded [`CatalogRequest`] in,
//!   [`CatalogResponse`] envelope out
//!
//! # Design Rules
//!
//! 1. Nothing is cached. Every call reflects the store as it is now.
//! 2. Store calls within one request run sequentially, one at a time.
//! 3. No retries. A store failure fails the operation, except in aggregation.
//! 4. Every store call observes the catalog's cancellation token.

pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod listing;
pub mod request;
pub mod response;
pub mod search;
pub mod walker;

#[cfg(test)]
mod test_support;

pub use aggregate::parse_folder_selection;
pub use catalog::Catalog;
pub use error::{CatalogError, CatalogResult};
pub use listing::DirectoryListing;
pub use request::CatalogRequest;
pub use response::{CatalogResponse, Payload};
pub use search::SearchQuery;

pub use tokio_util::sync::CancellationToken;
