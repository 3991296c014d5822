//! Dataset persistence boundary
//!
//! The pipeline core never performs I/O itself; callers load a table, run a
//! pipeline, and persist the result through this trait. An absent dataset is
//! a distinguishable [`Error::DatasetNotFound`], never a panic.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::table::Table;

/// A key-value store of named tables
pub trait DatasetStore: Send + Sync {
    /// Load a table by name
    fn load(&self, name: &str) -> Result<Table>;

    /// Persist a table under a name, overwriting any previous version
    fn save(&self, name: &str, table: &Table) -> Result<()>;

    /// Names of all stored datasets, sorted
    fn list(&self) -> Result<Vec<String>>;

    /// Delete a dataset by name
    fn delete(&self, name: &str) -> Result<()>;

    /// Whether a dataset exists
    fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.list()?.iter().any(|n| n == name))
    }
}

struct MemoryInner {
    tables: BTreeMap<String, Table>,
    saves: usize,
}

/// In-memory store, used in tests and as the simplest backend
///
/// Counts `save` calls so tests can assert that failed pipelines never
/// persist anything.
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                tables: BTreeMap::new(),
                saves: 0,
            }),
        }
    }

    /// Number of `save` calls observed so far
    pub fn save_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).saves
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStore for MemoryStore {
    fn load(&self, name: &str) -> Result<Table> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .tables
            .get(name)
            .cloned()
            .ok_or_else(|| Error::DatasetNotFound(name.to_string()))
    }

    fn save(&self, name: &str, table: &Table) -> Result<()> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.saves += 1;
        inner.tables.insert(name.to_string(), table.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.tables.keys().cloned().collect())
    }

    fn delete(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .tables
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::DatasetNotFound(name.to_string()))
    }

    fn contains(&self, name: &str) -> Result<bool> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.tables.contains_key(name))
    }
}
