//! Process-wide name → [`Table`] directory.
//!
//! An external collaborator to the cache core: the core never reaches into
//! this module, it only implements the contract the registry calls through.
//! Lazily initialised on first lookup, never torn down before process exit —
//! not a singleton of `Table` itself, each named table is independent.
//!
//! Guarded by its own `parking_lot::RwLock` with double-checked
//! initialization on name lookup, the same read-fast-path / write-slow-path
//! shape used elsewhere in this crate for concurrent maps.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::table::Table;

/// A process-wide directory of named [`Table`] instances sharing one
/// `(K, V)` pair — a caller needing multiple value types constructs one
/// `TableRegistry` per type.
pub struct TableRegistry<K, V> {
    tables: RwLock<HashMap<String, Arc<Table<K, V>>>>,
}

impl<K, V> Default for TableRegistry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TableRegistry<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Return the table named `name`, creating it (with no janitor) if it
    /// doesn't exist yet. Idempotent: repeated calls for the same name
    /// return the same `Arc`.
    #[must_use]
    pub fn lookup_or_create(&self, name: &str) -> Arc<Table<K, V>> {
        if let Some(table) = self.tables.read().get(name) {
            return table.clone();
        }

        let mut tables = self.tables.write();
        // Double-checked: another writer may have created it between our
        // read-lock release and this write-lock acquisition.
        if let Some(table) = tables.get(name) {
            return table.clone();
        }

        let table = Table::new(name);
        tables.insert(name.to_string(), table.clone());
        table
    }

    /// As [`TableRegistry::lookup_or_create`], but a newly created table
    /// starts a janitor ticking every `interval`. If the table already
    /// existed, `interval` has no effect on it.
    #[must_use]
    pub fn lookup_or_create_with_cleanup(&self, name: &str, interval: Duration) -> Arc<Table<K, V>> {
        if let Some(table) = self.tables.read().get(name) {
            return table.clone();
        }

        let mut tables = self.tables.write();
        if let Some(table) = tables.get(name) {
            return table.clone();
        }

        let table = Table::with_cleanup_interval(name, interval);
        tables.insert(name.to_string(), table.clone());
        table
    }

    /// Remove a table from the directory. The table itself (and its
    /// janitor) stays alive for as long as any other holder keeps its
    /// `Arc`.
    pub fn remove(&self, name: &str) -> Option<Arc<Table<K, V>>> {
        self.tables.write().remove(name)
    }

    /// Names currently registered.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }
}
