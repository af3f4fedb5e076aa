//! `wishlist-server`: serves the wishlist API over HTTP.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wishlist::app::App;
use wishlist::config::{AppConfig, Cli};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        backend = ?config.storage.backend,
        addr = %config.server.socket_addr(),
        "starting wishlist-server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let app = App::new(config).await?;
    app.run().await?;
    Ok(())
}
