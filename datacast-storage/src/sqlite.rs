//! SQLite-backed column store.
//!
//! All columns of all rows live in one `column_values` table keyed by
//! `(row_id, column_name)`. A NULL `value` is an explicitly stored null.

use crate::error::{StorageError, StorageResult};
use crate::store::ColumnStore;
use datacast_types::RowId;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Column store backed by SQLite.
#[derive(Clone)]
pub struct SqliteColumnStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteColumnStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening column store");
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StorageResult<()> {
        self.conn()?.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS column_values (
                row_id TEXT NOT NULL,
                column_name TEXT NOT NULL,
                value TEXT,
                PRIMARY KEY (row_id, column_name)
            );
            ",
        )?;
        Ok(())
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Columns stored for `row`, sorted by name.
    pub fn columns(&self, row: &RowId) -> StorageResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT column_name FROM column_values WHERE row_id = ?1 ORDER BY column_name",
        )?;
        let columns = stmt
            .query_map(params![row.to_string()], |r| r.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Removes every column of `row`. Returns the number of cells deleted.
    pub fn delete_row(&self, row: &RowId) -> StorageResult<usize> {
        let deleted = self.conn()?.execute(
            "DELETE FROM column_values WHERE row_id = ?1",
            params![row.to_string()],
        )?;
        Ok(deleted)
    }
}

impl ColumnStore for SqliteColumnStore {
    fn get_raw_column_value(&self, row: &RowId, column: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn()?
            .query_row(
                "SELECT value FROM column_values WHERE row_id = ?1 AND column_name = ?2",
                params![row.to_string(), column],
                |r| r.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(value.flatten())
    }

    fn set_raw_column_value(
        &self,
        row: &RowId,
        column: &str,
        value: Option<&str>,
    ) -> StorageResult<()> {
        self.conn()?.execute(
            "INSERT INTO column_values (row_id, column_name, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(row_id, column_name) DO UPDATE SET value = excluded.value",
            params![row.to_string(), column, value],
        )?;
        Ok(())
    }
}
