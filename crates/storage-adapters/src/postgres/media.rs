use async_trait::async_trait;
use domains::models::Media;
use domains::ports::{MediaRepository, PendingWrite};
use domains::DomainResult;
use sqlx::Row;
use uuid::Uuid;

use super::{db_err, reference, Database};

#[derive(Clone)]
pub struct PgMediaRepository {
    db: Database,
}

impl PgMediaRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MediaRepository for PgMediaRepository {
    async fn create(&self, media: &Media) -> DomainResult<(Media, PendingWrite)> {
        let (row, pending) = self
            .db
            .execute_tx(
                sqlx::query("INSERT INTO media (content_type) VALUES ($1) RETURNING id, reference_id")
                    .bind(media.content_type()),
            )
            .await?;

        let id: i64 = row.try_get("id").map_err(db_err)?;
        let reference_id: Uuid = row.try_get("reference_id").map_err(db_err)?;

        Ok((Media::from_parts(id, reference_id.to_string(), media.content_type().to_owned()), pending))
    }

    async fn get_content_type(&self, reference_id: &str) -> DomainResult<Option<String>> {
        let Some(reference_id) = reference(reference_id) else {
            return Ok(None);
        };

        let row = self
            .db
            .single(sqlx::query("SELECT content_type FROM media WHERE reference_id = $1").bind(reference_id))
            .await?;

        row.map(|row| row.try_get("content_type").map_err(db_err)).transpose()
    }
}
