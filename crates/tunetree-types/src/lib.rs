//! Foundation types for tunetree.
//!
//! tunetree presents a flat, prefix-addressed object store as a tree of media
//! files. This crate holds the pieces every other crate agrees on: how a
//! logical path maps onto a store key, which names count as audio, and the
//! fixed limits applied to search.
//!
//! # Key Types
//!
//! - [`Namespace`] -- Root prefix handling (`to_store_key` / `strip_root`)
//! - [`is_audio_file`] -- Closed audio-extension filter
//! - [`limits`] -- Search bounds shared by the engine and the transport

pub mod audio;
pub mod limits;
pub mod namespace;

pub use audio::{is_audio_file, AUDIO_EXTENSIONS};
pub use limits::{MAX_SEARCH_RESULTS, MIN_SEARCH_LEN};
pub use namespace::{Namespace, SEPARATOR, SEPARATOR_STR};
