//! SQLite connection management for the wishlist store.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`
//! and creates the wishlist table on open.

use rusqlite::Connection;
use std::fs;
use std::path::Path;

use super::schema;
use crate::types::errors::StorageError;

/// Owns the SQLite connection backing the embedded store.
///
/// The `wishlist_items` table is guaranteed to exist once a `Database`
/// has been constructed.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given file path and creates the table if absent.
    ///
    /// Missing parent directories are created first.
    ///
    /// # Errors
    /// Returns `StorageError` if the directory cannot be created, the file cannot
    /// be opened, or the table cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Opens an in-memory SQLite database and creates the table if absent.
    ///
    /// Useful for testing: the database is discarded when the `Database` is dropped.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        schema::init_schema(&self.conn)?;
        Ok(())
    }

    /// Returns a reference to the underlying `rusqlite::Connection`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
