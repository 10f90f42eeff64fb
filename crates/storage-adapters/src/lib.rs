//! # storage-adapters
//!
//! Persistence and object storage behind the `domains` store ports.
//!
//! - `db-postgres`: connection pool wrapper, migrations and the Postgres
//!   repositories/providers for users, posts and media.
//! - object stores: a sharded local directory store, and S3 behind `media-s3`.

pub mod error;
pub mod local;
#[cfg(feature = "db-postgres")]
pub mod postgres;
#[cfg(feature = "media-s3")]
pub mod s3;

pub use error::StorageError;
pub use local::LocalObjectStore;
#[cfg(feature = "db-postgres")]
pub use postgres::Database;
#[cfg(feature = "media-s3")]
pub use s3::S3ObjectStore;
