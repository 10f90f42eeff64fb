//! # Database
//!
//! Thin wrapper over the pool. Callers build parameterized queries with
//! `sqlx::query(..).bind(..)` and hand them to one of four shapes: a single
//! optional row, many rows, rows affected, or a row inside a transaction that
//! the caller later commits or rolls back.

use std::time::Duration;

use domains::ports::PendingWrite;
use domains::DomainResult;
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::Postgres;

use super::db_err;
use crate::error::StorageError;

pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn single(&self, query: PgQuery<'_>) -> DomainResult<Option<PgRow>> {
        query.fetch_optional(&self.pool).await.map_err(db_err)
    }

    pub async fn multiple(&self, query: PgQuery<'_>) -> DomainResult<Vec<PgRow>> {
        query.fetch_all(&self.pool).await.map_err(db_err)
    }

    /// Returns the number of rows affected.
    pub async fn execute(&self, query: PgQuery<'_>) -> DomainResult<u64> {
        let result = query.execute(&self.pool).await.map_err(db_err)?;
        Ok(result.rows_affected())
    }

    /// Runs `query` in a READ UNCOMMITTED transaction and returns its single
    /// row. The transaction stays open until the pending write is completed.
    pub async fn execute_tx(&self, query: PgQuery<'_>) -> DomainResult<(PgRow, PendingWrite)> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL READ UNCOMMITTED")
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let row = query.fetch_one(&mut *tx).await.map_err(db_err)?;

        let pending = PendingWrite::new(move |commit| async move {
            if commit {
                tx.commit().await.map_err(db_err)
            } else {
                tx.rollback().await.map_err(db_err)
            }
        });

        Ok((row, pending))
    }

    pub async fn ping(&self) -> DomainResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map_err(db_err)?;
        Ok(())
    }
}
