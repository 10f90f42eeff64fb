//! Users, followers and profile reads.

use async_trait::async_trait;
use domains::dto::{Info, Profile};
use domains::models::User;
use domains::ports::{FollowerRepository, UserProvider, UserRepository};
use domains::DomainResult;
use sqlx::FromRow;
use uuid::Uuid;

use super::{db_err, reference, Database};

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    reference_id: Uuid,
    username: String,
    password_hash: String,
    #[sqlx(default)]
    is_following: bool,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        User::from_parts(r.id, r.reference_id.to_string(), r.username, r.password_hash, r.is_following)
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: Database,
}

impl PgUserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> DomainResult<User> {
        let row = self
            .db
            .single(
                sqlx::query(
                    "INSERT INTO users (username, password_hash) VALUES ($1, $2) \
                     RETURNING id, reference_id, username, password_hash",
                )
                .bind(user.username())
                .bind(user.password_hash()),
            )
            .await?
            .ok_or_else(|| domains::DomainError::internal("insert returned no row"))?;

        Ok(UserRecord::from_row(&row).map_err(db_err)?.into())
    }

    async fn does_username_exist(&self, username: &str) -> DomainResult<bool> {
        let row = self
            .db
            .single(sqlx::query("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1) AS taken").bind(username))
            .await?;

        match row {
            Some(row) => sqlx::Row::try_get(&row, "taken").map_err(db_err),
            None => Ok(false),
        }
    }

    async fn get_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let row = self
            .db
            .single(
                sqlx::query("SELECT id, reference_id, username, password_hash FROM users WHERE username = $1")
                    .bind(username),
            )
            .await?;

        row.map(|row| UserRecord::from_row(&row).map(User::from).map_err(db_err)).transpose()
    }

    async fn get_by_reference(
        &self,
        reference_id: &str,
        viewer_reference_id: &str,
    ) -> DomainResult<Option<User>> {
        let Some(reference_id) = reference(reference_id) else {
            return Ok(None);
        };

        let row = self
            .db
            .single(
                sqlx::query(
                    "SELECT u.id, u.reference_id, u.username, u.password_hash, \
                        EXISTS (SELECT 1 FROM user_followers f \
                                JOIN users v ON v.id = f.follower_id \
                                WHERE f.user_id = u.id AND v.reference_id = $2) AS is_following \
                     FROM users u WHERE u.reference_id = $1",
                )
                .bind(reference_id)
                .bind(reference(viewer_reference_id)),
            )
            .await?;

        row.map(|row| UserRecord::from_row(&row).map(User::from).map_err(db_err)).transpose()
    }

    async fn get_id_by_reference(&self, reference_id: &str) -> DomainResult<Option<i64>> {
        let Some(reference_id) = reference(reference_id) else {
            return Ok(None);
        };

        let row = self
            .db
            .single(sqlx::query("SELECT id FROM users WHERE reference_id = $1").bind(reference_id))
            .await?;

        row.map(|row| sqlx::Row::try_get(&row, "id").map_err(db_err)).transpose()
    }
}

#[derive(Clone)]
pub struct PgFollowerRepository {
    db: Database,
}

impl PgFollowerRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FollowerRepository for PgFollowerRepository {
    async fn create(&self, user_id: i64, follower_reference_id: &str) -> DomainResult<u64> {
        let Some(follower) = reference(follower_reference_id) else {
            return Ok(0);
        };

        self.db
            .execute(
                sqlx::query(
                    "INSERT INTO user_followers (user_id, follower_id) \
                     SELECT $1, id FROM users WHERE reference_id = $2 \
                     ON CONFLICT DO NOTHING",
                )
                .bind(user_id)
                .bind(follower),
            )
            .await
    }

    async fn delete(&self, user_id: i64, follower_reference_id: &str) -> DomainResult<u64> {
        let Some(follower) = reference(follower_reference_id) else {
            return Ok(0);
        };

        self.db
            .execute(
                sqlx::query(
                    "DELETE FROM user_followers f USING users v \
                     WHERE f.follower_id = v.id AND f.user_id = $1 AND v.reference_id = $2",
                )
                .bind(user_id)
                .bind(follower),
            )
            .await
    }
}

#[derive(FromRow)]
struct ProfileRecord {
    reference_id: Uuid,
    username: String,
    media_id: Option<Uuid>,
    bio: Option<String>,
    follower_count: i64,
    is_following: bool,
    is_owner: bool,
    post_count: i64,
}

#[derive(FromRow)]
struct InfoRecord {
    reference_id: Uuid,
    username: String,
    media_id: Option<Uuid>,
    follower_count: i64,
}

#[derive(Clone)]
pub struct PgUserProvider {
    db: Database,
}

impl PgUserProvider {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserProvider for PgUserProvider {
    async fn get_profile(
        &self,
        username: &str,
        viewer_reference_id: &str,
    ) -> DomainResult<Option<Profile>> {
        let row = self
            .db
            .single(
                sqlx::query(
                    "SELECT u.reference_id, u.username, m.reference_id AS media_id, u.bio, \
                        (SELECT COUNT(*) FROM user_followers f WHERE f.user_id = u.id) AS follower_count, \
                        EXISTS (SELECT 1 FROM user_followers f \
                                JOIN users v ON v.id = f.follower_id \
                                WHERE f.user_id = u.id AND v.reference_id = $2) AS is_following, \
                        COALESCE(u.reference_id = $2, FALSE) AS is_owner, \
                        (SELECT COUNT(*) FROM posts p WHERE p.user_id = u.id) AS post_count \
                     FROM users u \
                     LEFT JOIN media m ON m.id = u.media_id \
                     WHERE u.username = $1",
                )
                .bind(username.to_lowercase())
                .bind(reference(viewer_reference_id)),
            )
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let r = ProfileRecord::from_row(&row).map_err(db_err)?;

        Ok(Some(Profile {
            user_id: r.reference_id.to_string(),
            username: r.username,
            media_id: r.media_id.map(|id| id.to_string()),
            bio: r.bio,
            follower_count: r.follower_count,
            is_following: r.is_following,
            is_owner: r.is_owner,
            post_count: r.post_count,
        }))
    }

    async fn get_info(&self, reference_id: &str) -> DomainResult<Option<Info>> {
        let Some(reference_id) = reference(reference_id) else {
            return Ok(None);
        };

        let row = self
            .db
            .single(
                sqlx::query(
                    "SELECT u.reference_id, u.username, m.reference_id AS media_id, \
                        (SELECT COUNT(*) FROM user_followers f WHERE f.user_id = u.id) AS follower_count \
                     FROM users u \
                     LEFT JOIN media m ON m.id = u.media_id \
                     WHERE u.reference_id = $1",
                )
                .bind(reference_id),
            )
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let r = InfoRecord::from_row(&row).map_err(db_err)?;

        Ok(Some(Info {
            id: r.reference_id.to_string(),
            username: r.username,
            media_id: r.media_id.map(|id| id.to_string()),
            follower_count: r.follower_count,
        }))
    }
}
