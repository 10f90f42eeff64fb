//! # Postgres adapters
//!
//! External identifiers are UUID `reference_id` columns; internal `id`s are
//! only used for joins. A reference that is not a UUID cannot exist in the
//! store, so it resolves to "not found" without a query.

mod database;
mod health;
mod media;
mod posts;
mod users;

pub use database::Database;
pub use health::DatabaseHealthCheck;
pub use media::PgMediaRepository;
pub use posts::{PgLikeRepository, PgPostProvider, PgPostRepository};
pub use users::{PgFollowerRepository, PgUserProvider, PgUserRepository};

use domains::DomainError;
use uuid::Uuid;

pub(crate) fn db_err(err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, "database call failed");
    DomainError::internal(err)
}

pub(crate) fn reference(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value).ok()
}
