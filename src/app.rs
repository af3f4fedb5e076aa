//! App core: wires configuration, the storage backend and the HTTP server.

use crate::api::{build_router, HttpServer, SharedStore};
use crate::config::AppConfig;
use crate::storage::open_store;

/// A configured wishlist service, ready to serve.
pub struct App {
    pub config: AppConfig,
    pub store: SharedStore,
}

impl App {
    /// Opens the configured storage backend, creating its table if absent.
    pub async fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let store = open_store(&config.storage).await?;
        tracing::info!(backend = store.backend_name(), "storage ready");
        Ok(Self { config, store })
    }

    /// Wraps an already opened store.
    pub fn with_store(config: AppConfig, store: SharedStore) -> Self {
        Self { config, store }
    }

    pub fn router(&self) -> axum::Router {
        build_router(self.store.clone(), &self.config.server)
    }

    /// Serves HTTP until shutdown.
    pub async fn run(self) -> Result<(), std::io::Error> {
        HttpServer::new(self.store, self.config.server).start().await
    }
}
