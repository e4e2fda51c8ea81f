// Cache path utilities.
// Maps cache keys to files under the cache directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/gistlist on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gistlist").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the file holding the entry for `key`.
pub fn entry_path(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{}.json", encode_name(key)))
}

/// Percent-encode a key into a file name.
/// Distinct keys map to distinct names, and `.` is encoded so no name is `..`.
fn encode_name(name: &str) -> String {
    urlencoding::encode(name).replace('.', "%2E")
}
