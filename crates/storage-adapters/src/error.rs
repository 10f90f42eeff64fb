//! # StorageError
//!
//! Setup failures (connect, migrate). Per-request failures are reported as
//! `DomainError` directly.

use domains::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[cfg(feature = "db-postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "db-postgres")]
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        DomainError::internal(err)
    }
}
