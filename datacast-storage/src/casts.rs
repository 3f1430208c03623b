//! Per-model cast table.

use crate::cast::{CastValue, ColumnCast};
use crate::error::{StorageError, StorageResult};
use crate::store::ColumnStore;
use datacast_types::RowId;
use std::collections::BTreeMap;
use tracing::debug;

/// Column name to [`ColumnCast`], the way a model declares its casts.
///
/// Only cast columns go through here; other columns are the storage
/// layer's business.
#[derive(Debug, Clone, Default)]
pub struct Casts {
    columns: BTreeMap<String, ColumnCast>,
}

impl Casts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, cast: ColumnCast) -> Self {
        self.columns.insert(column.into(), cast);
        self
    }

    pub fn get(&self, column: &str) -> Option<&ColumnCast> {
        self.columns.get(column)
    }

    /// Declared columns in name order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    fn cast(&self, column: &str) -> StorageResult<&ColumnCast> {
        self.get(column)
            .ok_or_else(|| StorageError::UnknownColumn(column.to_string()))
    }

    /// Casts `value` and writes it to `row.column`.
    pub fn save<S: ColumnStore + ?Sized>(
        &self,
        store: &S,
        row: &RowId,
        column: &str,
        value: &CastValue,
    ) -> StorageResult<()> {
        let text = self.cast(column)?.set(value)?;
        store.set_raw_column_value(row, column, text.as_deref())?;
        debug!(row = %row, column, null = text.is_none(), "saved cast column");
        Ok(())
    }

    /// Reads `row.column` and casts it back to a value.
    pub fn load<S: ColumnStore + ?Sized>(
        &self,
        store: &S,
        row: &RowId,
        column: &str,
    ) -> StorageResult<CastValue> {
        let cast = self.cast(column)?;
        let stored = store.get_raw_column_value(row, column)?;
        cast.get(stored.as_deref())
    }

    /// Saves several columns of one row. Every value is cast before anything
    /// is written, so a bad value leaves the row untouched.
    pub fn save_all<'a, S: ColumnStore + ?Sized>(
        &self,
        store: &S,
        row: &RowId,
        values: impl IntoIterator<Item = (&'a str, &'a CastValue)>,
    ) -> StorageResult<()> {
        let texts = values
            .into_iter()
            .map(|(column, value)| -> StorageResult<_> {
                Ok((column, self.cast(column)?.set(value)?))
            })
            .collect::<StorageResult<Vec<_>>>()?;
        for (column, text) in texts {
            store.set_raw_column_value(row, column, text.as_deref())?;
        }
        Ok(())
    }

    /// Loads every declared column of `row`.
    pub fn load_all<S: ColumnStore + ?Sized>(
        &self,
        store: &S,
        row: &RowId,
    ) -> StorageResult<BTreeMap<String, CastValue>> {
        self.columns
            .iter()
            .map(|(column, cast)| -> StorageResult<_> {
                let stored = store.get_raw_column_value(row, column)?;
                Ok((column.clone(), cast.get(stored.as_deref())?))
            })
            .collect()
    }
}
