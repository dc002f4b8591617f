//! Audio file classification.
//!
//! Only names whose final extension is in [`AUDIO_EXTENSIONS`] are visible to
//! listing, search and aggregation. Everything else is silently skipped.

use crate::namespace::SEPARATOR;

/// Recognized audio extensions, lower-case, without the leading dot.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "mp4"];

/// Returns `true` if the final segment of `name` carries an audio extension.
///
/// Only the extension is compared case-insensitively; a dot inside a directory
/// segment does not count.
///
/// # Examples
///
/// ```
/// use tunetree_types::is_audio_file;
///
/// assert!(is_audio_file("jazz/miles.MP3"));
/// assert!(!is_audio_file("jazz/notes.txt"));
/// assert!(!is_audio_file("album.mp3/cover"));
/// ```
pub fn is_audio_file(name: &str) -> bool {
    let file_name = name.rsplit(SEPARATOR).next().unwrap_or(name);
    match file_name.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}
