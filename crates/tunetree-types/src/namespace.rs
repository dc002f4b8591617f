//! Mapping between logical relative paths and object-store keys.
//!
//! Every key tunetree reads lives under one fixed root prefix. A
//! [`Namespace`] owns that prefix and converts in both directions:
//!
//! - `to_store_key("jazz/miles.mp3")` → `"music/jazz/miles.mp3"`
//! - `strip_root("music/jazz/miles.mp3")` → `"jazz/miles.mp3"`
//!
//! Directories are never stored. A directory path such as `"jazz"` is
//! addressed through [`Namespace::directory_key`], which pins it to a
//! separator boundary so that `"jazz"` never matches `"jazzfusion/..."`.

use serde::{Deserialize, Serialize};

/// Path separator used to group keys into directory levels.
pub const SEPARATOR: char = '/';

/// [`SEPARATOR`] as a string slice, for APIs that take a delimiter string.
pub const SEPARATOR_STR: &str = "/";

/// The fixed root prefix under which all catalog keys live.
///
/// The prefix is normalized on construction: repeated trailing separators
/// collapse to one, one is appended if missing, and a prefix made only of
/// separators becomes the empty (unrooted) namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Namespace {
    root: String,
}

impl Namespace {
    /// Create a namespace rooted at `root_prefix`.
    pub fn new(root_prefix: impl Into<String>) -> Self {
        let mut root = root_prefix.into();
        root.truncate(root.trim_end_matches(SEPARATOR).len());
        if !root.is_empty() {
            root.push(SEPARATOR);
        }
        Self { root }
    }

    /// A namespace covering the whole store.
    pub fn unrooted() -> Self {
        Self::default()
    }

    /// The normalized root prefix (empty, or ending in [`SEPARATOR`]).
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Prepend the root prefix to a relative path.
    pub fn to_store_key(&self, relative: &str) -> String {
        let mut key = String::with_capacity(self.root.len() + relative.len());
        key.push_str(&self.root);
        key.push_str(relative);
        key
    }

    /// Remove the root prefix from a store key.
    ///
    /// Lossless for every key produced by [`Self::to_store_key`]. Keys outside
    /// the namespace are returned unchanged.
    pub fn strip_root<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(self.root.as_str()).unwrap_or(key)
    }

    /// Store prefix addressing the contents of a directory.
    ///
    /// Surrounding separators on `dir` are ignored; a non-empty directory is
    /// terminated with one separator. The tree root (`""`) maps to the bare
    /// root prefix.
    pub fn directory_key(&self, dir: &str) -> String {
        let dir = dir.trim_matches(SEPARATOR);
        let mut key = self.to_store_key(dir);
        if !dir.is_empty() {
            key.push(SEPARATOR);
        }
        key
    }

}

impl From<String> for Namespace {
    fn from(root: String) -> Self {
        Self::new(root)
    }
}

impl From<&str> for Namespace {
    fn from(root: &str) -> Self {
        Self::new(root)
    }
}

impl From<Namespace> for String {
    fn from(ns: Namespace) -> Self {
        ns.root
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.root)
    }
}
