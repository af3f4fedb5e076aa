//! Runtime configuration for the wishlist server.
//!
//! Values are layered: built-in defaults, then an optional JSON config file,
//! then `WISHLIST_*` / `DATABASE_URL` environment variables, then command-line
//! flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::types::errors::ConfigError;

/// Which storage backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Embedded SQLite file.
    #[default]
    Sqlite,
    /// PostgreSQL server reached over the network.
    Postgres,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            other => Err(ConfigError::Parse(format!("unknown storage backend: {}", other))),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Storage backend selection and connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,

    /// Connection string for the postgres backend.
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("data").join("wishlist.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            sqlite_path: default_sqlite_path(),
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Reads a JSON config file. Keys missing from the file take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::Io(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let mut config: AppConfig = serde_json::from_str(&content).map_err(|e| {
            ConfigError::Parse(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;
        if config.log_filter.is_empty() {
            config.log_filter = default_log_filter();
        }
        Ok(config)
    }

    /// Applies environment overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Applies environment overrides using `lookup` to resolve variables.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("WISHLIST_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("WISHLIST_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("WISHLIST_PORT is not a port: {}", port)))?;
        }
        if let Some(backend) = lookup("WISHLIST_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(path) = lookup("WISHLIST_DB_PATH") {
            self.storage.sqlite_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database_url = Some(url);
        }
        Ok(())
    }

    /// Applies command-line flags, which take precedence over everything else.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(backend) = cli.backend {
            self.storage.backend = backend;
        }
        if let Some(path) = &cli.db_path {
            self.storage.sqlite_path = path.clone();
        }
        if let Some(url) = &cli.database_url {
            self.storage.database_url = Some(url.clone());
        }
    }

    /// Rejects combinations the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server port must be non-zero".to_string()));
        }
        match self.storage.backend {
            Backend::Sqlite if self.storage.sqlite_path.as_os_str().is_empty() => Err(
                ConfigError::Invalid("sqlite backend requires a database path".to_string()),
            ),
            Backend::Postgres
                if self
                    .storage
                    .database_url
                    .as_deref()
                    .map_or(true, |u| u.trim().is_empty()) =>
            {
                Err(ConfigError::Invalid(
                    "postgres backend requires DATABASE_URL".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Builds the effective configuration for a server start.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }
}

/// Command-line flags for `wishlist-server`.
#[derive(Debug, Default, Parser)]
#[command(name = "wishlist-server", version, about = "Personal wishlist CRUD API")]
pub struct Cli {
    /// Path to a JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Storage backend
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// SQLite database file
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// PostgreSQL connection string
    #[arg(long)]
    pub database_url: Option<String>,
}
