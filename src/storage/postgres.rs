//! Managed PostgreSQL backend over a `sqlx` connection pool.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::WishlistStore;
use crate::types::errors::StorageError;
use crate::types::wishlist::{self, NewWishlistItem, WishlistItem, WishlistItemPatch};

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS wishlist_items (
        id BIGSERIAL PRIMARY KEY,
        link TEXT NOT NULL,
        notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )";

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_wishlist_items_created_at ON wishlist_items (created_at)";

const RETURNING: &str = "RETURNING id, link, notes, created_at, updated_at";

/// Network store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connects to `database_url` and creates the table if it is absent.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl WishlistStore for PostgresStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<WishlistItem>, StorageError> {
        let items = sqlx::query_as::<_, WishlistItem>(
            "SELECT id, link, notes, created_at, updated_at FROM wishlist_items \
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<WishlistItem>, StorageError> {
        let item = sqlx::query_as::<_, WishlistItem>(
            "SELECT id, link, notes, created_at, updated_at FROM wishlist_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn create(&self, item: NewWishlistItem) -> Result<WishlistItem, StorageError> {
        let notes = item.notes.filter(|n| !n.is_empty());
        let now = wishlist::now();
        let created = sqlx::query_as::<_, WishlistItem>(&format!(
            "INSERT INTO wishlist_items (link, notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $3) {}",
            RETURNING
        ))
        .bind(item.link)
        .bind(notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    // Read-then-write without a transaction; concurrent patches are last-write-wins.
    async fn update(
        &self,
        id: i64,
        patch: WishlistItemPatch,
    ) -> Result<Option<WishlistItem>, StorageError> {
        let Some(existing) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let (link, notes) = patch.merge(&existing);
        let updated = sqlx::query_as::<_, WishlistItem>(&format!(
            "UPDATE wishlist_items SET link = $1, notes = $2, updated_at = $3 WHERE id = $4 {}",
            RETURNING
        ))
        .bind(link)
        .bind(notes)
        .bind(wishlist::touch(existing.updated_at))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn remove(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM wishlist_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
