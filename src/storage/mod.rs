//! Storage adapter for wishlist items.
//!
//! [`WishlistStore`] is the only interface the HTTP layer sees. Two backends
//! implement it: [`SqliteStore`] (embedded file) and, with the `postgres`
//! feature, [`PostgresStore`] (managed server). [`open_store`] picks one from
//! configuration at startup.

pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Backend, StorageConfig};
use crate::types::errors::StorageError;
use crate::types::wishlist::{NewWishlistItem, WishlistItem, WishlistItemPatch};

pub use sqlite::SqliteStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

/// CRUD primitives over the wishlist table.
///
/// A missing id is an ordinary outcome (`None` / `false`); `Err` is reserved
/// for backend faults.
#[async_trait]
pub trait WishlistStore: Send + Sync {
    /// Short backend identifier, e.g. `"sqlite"`.
    fn backend_name(&self) -> &'static str;

    /// Cheap round-trip to the backend.
    async fn ping(&self) -> Result<(), StorageError>;

    /// All items, newest `created_at` first. Empty table yields an empty vec.
    async fn list_all(&self) -> Result<Vec<WishlistItem>, StorageError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<WishlistItem>, StorageError>;

    /// Inserts an item with `created_at == updated_at == now` and returns it with its id.
    async fn create(&self, item: NewWishlistItem) -> Result<WishlistItem, StorageError>;

    /// Applies the supplied fields and refreshes `updated_at`.
    async fn update(
        &self,
        id: i64,
        patch: WishlistItemPatch,
    ) -> Result<Option<WishlistItem>, StorageError>;

    /// Returns `true` if a row was deleted.
    async fn remove(&self, id: i64) -> Result<bool, StorageError>;
}

/// Opens the backend named in `config`.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn WishlistStore>, StorageError> {
    match config.backend {
        Backend::Sqlite => {
            let path = config.sqlite_path.clone();
            let store = tokio::task::spawn_blocking(move || SqliteStore::open(path)).await??;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "postgres")]
        Backend::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                StorageError::Connection("postgres backend requires a database URL".to_string())
            })?;
            let store = PostgresStore::connect(url, config.max_connections).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        Backend::Postgres => Err(StorageError::Connection(
            "postgres backend not compiled in; rebuild with --features postgres".to_string(),
        )),
    }
}
