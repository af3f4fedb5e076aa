use thiserror::Error;

// === StorageError ===

/// Faults raised by a storage backend.
///
/// A missing record is not a fault: lookups report it as `None` / `false`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A query or statement failed.
    #[error("Storage database error: {0}")]
    Database(String),
    /// The backend could not be reached or its connection was lost.
    #[error("Storage connection error: {0}")]
    Connection(String),
    /// Filesystem error while preparing the store.
    #[error("Storage I/O error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::CannotOpen | rusqlite::ErrorCode::NotADatabase) => {
                StorageError::Connection(err.to_string())
            }
            _ => StorageError::Database(err.to_string()),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StorageError {
    fn from(err: tokio::task::JoinError) -> Self {
        StorageError::Database(format!("storage task failed: {}", err))
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => StorageError::Connection(err.to_string()),
            other => StorageError::Database(other.to_string()),
        }
    }
}

// === ConfigError ===

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Config I/O error: {0}")]
    Io(String),
    /// The config file or an environment value could not be parsed.
    #[error("Config parse error: {0}")]
    Parse(String),
    /// The merged configuration is not usable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
