//! Column casts and column stores for datacast.
//!
//! A [`ColumnCast`] turns a live Data value (or collection, or raw JSON) into
//! the text stored in one database column and back, optionally encrypting
//! it. [`Casts`] groups the casts of a model and reads/writes them through
//! any [`ColumnStore`].
//!
//! # Architecture
//!
//! - Encoding, morph resolution and encryption are delegated to
//!   `datacast-morph`
//! - Stores only move raw text: [`MemoryColumnStore`] for tests and
//!   transient models, [`SqliteColumnStore`] for a single-table SQLite file

mod cast;
mod casts;
mod error;
mod sqlite;
mod store;

pub use cast::{CastValue, ColumnCast};
pub use casts::Casts;
pub use error::{StorageError, StorageResult};
pub use sqlite::SqliteColumnStore;
pub use store::{ColumnStore, MemoryColumnStore};
