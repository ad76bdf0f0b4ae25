//! In-memory preference storage.

use crate::domain::error::{FeedscopeError, Result};
use crate::storage::backend::PreferenceStorage;
use crate::storage::models::PersistedFilters;
use std::collections::HashMap;

/// Keeps records in a map for the lifetime of the process.
///
/// A storage created with [`MemoryStorage::failing`] rejects every operation,
/// which is how an unavailable backend (quota exceeded, private browsing, a
/// read-only disk) is simulated.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: HashMap<String, PersistedFilters>,
    failing: bool,
    writes: usize,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage whose every operation fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Seeds `namespace` with `record` without counting a write.
    #[must_use]
    pub fn with_record(mut self, namespace: &str, record: PersistedFilters) -> Self {
        self.records.insert(namespace.to_string(), record);
        self
    }

    /// Number of successful [`save`](PreferenceStorage::save) calls.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(FeedscopeError::Storage("storage unavailable".to_string()));
        }
        Ok(())
    }
}

impl PreferenceStorage for MemoryStorage {
    fn load(&self, namespace: &str) -> Result<Option<PersistedFilters>> {
        self.check()?;
        Ok(self.records.get(namespace).cloned())
    }

    fn save(&mut self, namespace: &str, record: &PersistedFilters) -> Result<()> {
        self.check()?;
        self.records.insert(namespace.to_string(), record.clone());
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self, namespace: &str) -> Result<()> {
        self.check()?;
        self.records.remove(namespace);
        Ok(())
    }
}
