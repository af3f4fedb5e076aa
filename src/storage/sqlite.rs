//! Embedded SQLite backend.
//!
//! [`SqliteWishlist`] runs the queries against a borrowed connection;
//! [`SqliteStore`] owns the connection and exposes it through the async
//! [`WishlistStore`] trait by moving each call onto the blocking pool.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::WishlistStore;
use crate::database::Database;
use crate::types::errors::StorageError;
use crate::types::wishlist::{self, NewWishlistItem, WishlistItem, WishlistItemPatch};

const SELECT_COLUMNS: &str = "SELECT id, link, notes, created_at, updated_at FROM wishlist_items";

/// Synchronous wishlist queries over a SQLite connection.
pub struct SqliteWishlist<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteWishlist<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<WishlistItem> {
        Ok(WishlistItem {
            id: row.get(0)?,
            link: row.get(1)?,
            notes: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    /// All items, newest first. Items sharing a timestamp fall back to id order.
    pub fn list_all(&self) -> Result<Vec<WishlistItem>, StorageError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))?;
        let rows = stmt.query_map([], Self::row_to_item)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<WishlistItem>, StorageError> {
        let item = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                Self::row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    /// Inserts a new item. Empty notes are stored as `NULL`.
    pub fn create(&self, item: NewWishlistItem) -> Result<WishlistItem, StorageError> {
        let notes = item.notes.filter(|n| !n.is_empty());
        let now = wishlist::now();

        self.conn.execute(
            "INSERT INTO wishlist_items (link, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![item.link, notes, now, now],
        )?;

        Ok(WishlistItem {
            id: self.conn.last_insert_rowid(),
            link: item.link,
            notes,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies `patch` to the item with `id`.
    ///
    /// Reads the stored row first, then writes the merged values. The two
    /// statements are not wrapped in a transaction: with several writers the
    /// last write wins.
    pub fn update(
        &self,
        id: i64,
        patch: &WishlistItemPatch,
    ) -> Result<Option<WishlistItem>, StorageError> {
        let Some(existing) = self.get_by_id(id)? else {
            return Ok(None);
        };

        let (link, notes) = patch.merge(&existing);
        let updated_at = wishlist::touch(existing.updated_at);

        let affected = self.conn.execute(
            "UPDATE wishlist_items SET link = ?1, notes = ?2, updated_at = ?3 WHERE id = ?4",
            params![link, notes, updated_at, id],
        )?;
        if affected == 0 {
            return Ok(None);
        }

        Ok(Some(WishlistItem {
            id,
            link,
            notes,
            created_at: existing.created_at,
            updated_at,
        }))
    }

    /// Deletes the item with `id`. Returns whether a row was removed.
    pub fn remove(&self, id: i64) -> Result<bool, StorageError> {
        let affected = self
            .conn
            .execute("DELETE FROM wishlist_items WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

/// File-backed store shared across request handlers.
#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Mutex<Database>>,
}

impl SqliteStore {
    /// Opens the database file at `path`, creating it and its table if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Ok(Self::from_database(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    pub fn from_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    async fn with_wishlist<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(SqliteWishlist<'_>) -> Result<T, StorageError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let guard = db
                .lock()
                .map_err(|_| StorageError::Database("connection lock poisoned".to_string()))?;
            op(SqliteWishlist::new(guard.connection()))
        })
        .await?
    }
}

#[async_trait]
impl WishlistStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.with_wishlist(|w| {
            w.conn.query_row("SELECT 1", [], |_| Ok(()))?;
            Ok(())
        })
        .await
    }

    async fn list_all(&self) -> Result<Vec<WishlistItem>, StorageError> {
        self.with_wishlist(|w| w.list_all()).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<WishlistItem>, StorageError> {
        self.with_wishlist(move |w| w.get_by_id(id)).await
    }

    async fn create(&self, item: NewWishlistItem) -> Result<WishlistItem, StorageError> {
        self.with_wishlist(move |w| w.create(item)).await
    }

    async fn update(
        &self,
        id: i64,
        patch: WishlistItemPatch,
    ) -> Result<Option<WishlistItem>, StorageError> {
        self.with_wishlist(move |w| w.update(id, &patch)).await
    }

    async fn remove(&self, id: i64) -> Result<bool, StorageError> {
        self.with_wishlist(move |w| w.remove(id)).await
    }
}
