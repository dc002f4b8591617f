//! Recursive enumeration of the implied directory tree.
//!
//! Directories are discovered level by level with delimited listings and
//! visited depth-first in store order. Files need no recursion: a single
//! delimiter-free listing already covers an entire subtree, so it is streamed
//! page by page and filtered as it goes.
//!
//! Both walks are all-or-nothing. An error anywhere discards what has been
//! collected so far.

use tracing::debug;

use tunetree_types::{is_audio_file, SEPARATOR};

use crate::catalog::Catalog;
use crate::error::CatalogResult;

/// Join a directory path and a child name.
pub(crate) fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}{SEPARATOR}{name}")
    }
}

impl Catalog {
    /// Every directory in the tree, depth-first, root (`""`) first.
    ///
    /// Each directory is emitted before its descendants; siblings keep the
    /// store's native order. The walk uses an explicit stack, so tree depth
    /// is bounded only by memory.
    pub async fn enumerate_directories(&self) -> CatalogResult<Vec<String>> {
        let mut dirs = vec![String::new()];
        let mut pending = vec![String::new()];

        while let Some(dir) = pending.pop() {
            if !dir.is_empty() {
                dirs.push(dir.clone());
            }
            let level = self.list_one_level(&dir).await?;
            // Reverse so the first sibling is popped (visited) first.
            pending.extend(level.dirs.iter().rev().map(|child| join(&dir, child)));
        }

        debug!(count = dirs.len(), "enumerated directories");
        Ok(dirs)
    }

    /// Every audio file under `path`, as paths relative to the tree root, in
    /// store order.
    pub async fn enumerate_audio_files(&self, path: &str) -> CatalogResult<Vec<String>> {
        let mut files = Vec::new();
        self.scan_audio_files(path, |file| files.push(file)).await?;
        debug!(path, count = files.len(), "enumerated audio files");
        Ok(files)
    }

    /// Stream every audio file under `path` into `visit`, in store order.
    ///
    /// Pages are requested only as they are consumed, and only what `visit`
    /// keeps stays in memory. The listing is always driven to the end, so a
    /// failure on any page fails the scan.
    pub(crate) async fn scan_audio_files<F>(&self, path: &str, mut visit: F) -> CatalogResult<()>
    where
        F: FnMut(String) + Send,
    {
        let prefix = self.namespace().directory_key(path);
        let mut objects = self.store().list_flat(&prefix);

        while let Some(obj) = self.next_guarded(&mut objects).await? {
            let relative = self.namespace().strip_root(&obj.key);
            if is_audio_file(relative) {
                visit(relative.to_string());
            }
        }
        Ok(())
    }
}
