//! Preference storage abstraction.
//!
//! The [`PreferenceStorage`] trait hides where persisted filters live. Sessions
//! only ever load one record on start and save one record after each change, so
//! the trait is keyed by a namespace and nothing more.

use crate::domain::error::Result;
use crate::storage::models::PersistedFilters;

/// Abstraction over persistent preference backends.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes (default)
/// - [`MemoryStorage`](crate::storage::MemoryStorage): in-process map, used with
///   persistence disabled and in tests
///
/// # Examples
///
/// ```no_run
/// use feedscope::storage::{JsonStorage, PreferenceStorage};
/// use std::path::PathBuf;
///
/// let storage = JsonStorage::new(PathBuf::from("/tmp/feedscope.json"))?;
/// let record = storage.load("feed-filters")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait PreferenceStorage {
    /// Loads the record stored under `namespace`.
    ///
    /// Returns `Ok(None)` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load(&self, namespace: &str) -> Result<Option<PersistedFilters>>;

    /// Stores `record` under `namespace`, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The previous record is left intact.
    fn save(&mut self, namespace: &str, record: &PersistedFilters) -> Result<()>;

    /// Removes the record stored under `namespace`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn clear(&mut self, namespace: &str) -> Result<()>;
}
