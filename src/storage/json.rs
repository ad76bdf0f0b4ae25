//! JSON file-based preference storage.
//!
//! Records live in one human-readable JSON file, keyed by namespace. Writes go
//! to a temporary file that is renamed over the target, so a crash never
//! leaves a half-written file behind.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "records": {
//!     "feed-filters": {
//!       "selectedPlatforms": ["VRChat"],
//!       "sortBy": "popular",
//!       "viewMode": "compact",
//!       "postsPerPage": 20
//!     }
//!   }
//! }
//! ```

use crate::domain::error::{FeedscopeError, Result};
use crate::storage::backend::PreferenceStorage;
use crate::storage::models::PersistedFilters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    version: u32,

    #[serde(default)]
    records: BTreeMap<String, PersistedFilters>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            records: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// The whole file is loaded on creation and kept in memory; every successful
/// [`save`](PreferenceStorage::save) or [`clear`](PreferenceStorage::clear)
/// rewrites it. A write that fails leaves the storage dirty and is retried on
/// the next write or on drop.
#[derive(Debug)]
pub struct JsonStorage {
    file_path: PathBuf,
    data: StorageData,
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens the storage file at `file_path`.
    ///
    /// Parent directories are created as needed. A missing file starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        tracing::debug!(record_count = data.records.len(), "storage initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| FeedscopeError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version != FORMAT_VERSION {
            tracing::warn!(version = data.version, expected = FORMAT_VERSION, "unexpected storage version");
        }
        tracing::debug!(version = data.version, records = data.records.len(), "loaded storage data");

        Ok(data)
    }

    /// Writes the in-memory data to disk via temp file and rename.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| FeedscopeError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl PreferenceStorage for JsonStorage {
    fn load(&self, namespace: &str) -> Result<Option<PersistedFilters>> {
        Ok(self.data.records.get(namespace).cloned())
    }

    fn save(&mut self, namespace: &str, record: &PersistedFilters) -> Result<()> {
        let _span = tracing::debug_span!("storage_save", namespace = %namespace).entered();

        if self.data.records.get(namespace) == Some(record) && !self.dirty {
            tracing::trace!("record unchanged");
            return Ok(());
        }
        self.data.records.insert(namespace.to_string(), record.clone());
        self.dirty = true;
        self.save_to_file()
    }

    fn clear(&mut self, namespace: &str) -> Result<()> {
        let _span = tracing::debug_span!("storage_clear", namespace = %namespace).entered();

        if self.data.records.remove(namespace).is_some() {
            self.dirty = true;
        }
        self.save_to_file()
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}
