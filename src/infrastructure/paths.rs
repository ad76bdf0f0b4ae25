//! Filesystem locations for persisted preferences.

use std::path::{Path, PathBuf};

/// File name of the preference store inside the data directory.
pub const STORAGE_FILE: &str = "filters.json";

/// Returns the data directory for feedscope storage.
///
/// Resolves to the platform data directory (`~/.local/share/feedscope` on
/// Linux), falling back to `./.feedscope` when no data directory is known.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".feedscope"), |dir| dir.join("feedscope"))
}

/// Default path of the preference store.
#[must_use]
pub fn default_storage_path() -> PathBuf {
    get_data_dir().join(STORAGE_FILE)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or any path when the home directory is
/// unknown, are returned unchanged.
///
/// # Examples
///
/// ```
/// use feedscope::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => Path::new(p).to_path_buf(),
    }
}
