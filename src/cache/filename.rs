//! Filename Codec
//!
//! Derives the on-disk file name for a key.

use std::path::{Path, PathBuf};

/// Characters rejected by at least one common filesystem.
pub const ILLEGAL_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Concatenates `prefix` and `key` and strips [`ILLEGAL_CHARS`].
///
/// Keys that differ only by stripped characters share a file name.
pub fn sanitize(prefix: &str, key: &str) -> String {
    prefix
        .chars()
        .chain(key.chars())
        .filter(|c| !ILLEGAL_CHARS.contains(c))
        .collect()
}

/// Full path of the backing file for `key` inside `dir`.
pub fn file_path(dir: &Path, prefix: &str, key: &str) -> PathBuf {
    dir.join(sanitize(prefix, key))
}
