//! In-memory bar store.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tickbar_types::{Bar, StoreError};

use crate::sink::{BarStore, is_valid_name, split_qualified, upsert_bar};

/// Non-durable [`BarStore`] keeping tables in memory.
///
/// Clones share the same tables, so a handle kept by the caller observes
/// bars saved through a clone handed to an aggregator.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    databases: HashSet<String>,
    columns: HashMap<String, Vec<String>>,
    rows: HashMap<String, Vec<Bar>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rows of a `<database>.<table>` table.
    #[must_use]
    pub fn bars(&self, table: &str) -> Vec<Bar> {
        self.inner.lock().rows.get(table).cloned().unwrap_or_default()
    }

    /// Returns the qualified names of all tables, sorted.
    #[must_use]
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<_> = self.inner.lock().columns.keys().cloned().collect();
        names.sort();
        names
    }
}

impl BarStore for MemoryStore {
    fn ensure_database(&mut self, name: &str) -> Result<(), StoreError> {
        if !is_valid_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        self.inner.lock().databases.insert(name.to_string());
        Ok(())
    }

    fn ensure_table(
        &mut self,
        database: &str,
        table: &str,
        columns: &[&str],
    ) -> Result<(), StoreError> {
        if !is_valid_name(table) {
            return Err(StoreError::InvalidName(table.to_string()));
        }

        let mut tables = self.inner.lock();
        if !tables.databases.contains(database) {
            return Err(StoreError::UnknownDatabase(database.to_string()));
        }

        let qualified = format!("{database}.{table}");
        let wanted: Vec<String> = columns.iter().map(ToString::to_string).collect();
        match tables.columns.get(&qualified) {
            Some(existing) if *existing != wanted => Err(StoreError::SchemaMismatch {
                table: qualified,
                expected: wanted.join(","),
                found: existing.join(","),
            }),
            Some(_) => Ok(()),
            None => {
                tables.columns.insert(qualified.clone(), wanted);
                tables.rows.insert(qualified, Vec::new());
                Ok(())
            }
        }
    }

    fn save_bar(&mut self, table: &str, bar: &Bar, replace_count: usize) -> Result<(), StoreError> {
        split_qualified(table)?;
        let mut tables = self.inner.lock();
        let rows = tables
            .rows
            .get_mut(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        upsert_bar(rows, *bar, replace_count);
        Ok(())
    }
}
