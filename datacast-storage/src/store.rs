//! The raw column contract and an in-memory implementation.

use crate::error::{StorageError, StorageResult};
use datacast_types::RowId;
use std::collections::HashMap;
use std::sync::Mutex;

/// Reads and writes raw column text.
///
/// Stores do no encoding of their own. A column that was never written and a
/// column explicitly set to null both read back as `None`.
pub trait ColumnStore: Send + Sync {
    fn get_raw_column_value(&self, row: &RowId, column: &str) -> StorageResult<Option<String>>;

    fn set_raw_column_value(
        &self,
        row: &RowId,
        column: &str,
        value: Option<&str>,
    ) -> StorageResult<()>;
}

/// Column store backed by a map. Used in tests and for transient models.
#[derive(Debug, Default)]
pub struct MemoryColumnStore {
    cells: Mutex<HashMap<(RowId, String), Option<String>>>,
}

impl MemoryColumnStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns written for `row`, sorted by name.
    pub fn columns(&self, row: &RowId) -> StorageResult<Vec<String>> {
        let cells = self.cells.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut columns: Vec<String> = cells
            .keys()
            .filter(|(id, _)| id == row)
            .map(|(_, column)| column.clone())
            .collect();
        columns.sort();
        Ok(columns)
    }
}

impl ColumnStore for MemoryColumnStore {
    fn get_raw_column_value(&self, row: &RowId, column: &str) -> StorageResult<Option<String>> {
        let cells = self.cells.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(cells.get(&(*row, column.to_string())).cloned().flatten())
    }

    fn set_raw_column_value(
        &self,
        row: &RowId,
        column: &str,
        value: Option<&str>,
    ) -> StorageResult<()> {
        let mut cells = self.cells.lock().map_err(|_| StorageError::LockPoisoned)?;
        cells.insert((*row, column.to_string()), value.map(str::to_string));
        Ok(())
    }
}
