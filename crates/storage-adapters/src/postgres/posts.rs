//! Posts, likes and feed reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::dto::{FeedItem, PostView};
use domains::models::Post;
use domains::ports::{LikeRepository, PostProvider, PostRepository};
use domains::{DomainError, DomainResult};
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use uuid::Uuid;

use super::{db_err, reference, Database};

#[derive(FromRow)]
struct PostRecord {
    id: i64,
    reference_id: Uuid,
    user_id: i64,
    media_id: Option<i64>,
    posted: DateTime<Utc>,
    caption: String,
    like_count: i64,
    has_user_liked: bool,
}

impl From<PostRecord> for Post {
    fn from(r: PostRecord) -> Self {
        Post::from_parts(
            r.id,
            r.reference_id.to_string(),
            r.user_id,
            r.media_id,
            r.posted,
            r.caption,
            r.like_count,
            r.has_user_liked,
        )
    }
}

#[derive(FromRow)]
struct FeedRecord {
    id: Uuid,
    media_id: Option<Uuid>,
    caption: String,
    posted: DateTime<Utc>,
    username: String,
    likes: i64,
    has_user_liked: bool,
    is_author: bool,
}

impl From<FeedRecord> for FeedItem {
    fn from(r: FeedRecord) -> Self {
        FeedItem {
            id: r.id.to_string(),
            media_id: r.media_id.map(|id| id.to_string()),
            caption: r.caption,
            posted: r.posted,
            username: r.username,
            likes: r.likes,
            has_user_liked: r.has_user_liked,
            is_author: r.is_author,
        }
    }
}

fn feed(rows: Vec<PgRow>) -> DomainResult<Vec<FeedItem>> {
    rows.iter()
        .map(|row| FeedRecord::from_row(row).map(FeedItem::from).map_err(db_err))
        .collect()
}

#[derive(Clone)]
pub struct PgPostRepository {
    db: Database,
}

impl PgPostRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, post: &Post) -> DomainResult<Post> {
        let row = self
            .db
            .single(
                sqlx::query(
                    "INSERT INTO posts (user_id, media_id, posted, caption) VALUES ($1, $2, $3, $4) \
                     RETURNING id, reference_id",
                )
                .bind(post.user_id)
                .bind(post.media_id)
                .bind(post.posted)
                .bind(post.caption()),
            )
            .await?
            .ok_or_else(|| DomainError::internal("insert returned no row"))?;

        let mut created = post.clone();
        created.id = sqlx::Row::try_get(&row, "id").map_err(db_err)?;
        created.reference_id = sqlx::Row::try_get::<Uuid, _>(&row, "reference_id").map_err(db_err)?.to_string();
        Ok(created)
    }

    async fn get(&self, reference_id: &str, viewer_reference_id: &str) -> DomainResult<Option<Post>> {
        let Some(reference_id) = reference(reference_id) else {
            return Ok(None);
        };

        let row = self
            .db
            .single(
                sqlx::query(
                    "SELECT p.id, p.reference_id, p.user_id, p.media_id, p.posted, p.caption, \
                        (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS like_count, \
                        EXISTS (SELECT 1 FROM post_likes l \
                                JOIN users v ON v.id = l.user_id \
                                WHERE l.post_id = p.id AND v.reference_id = $2) AS has_user_liked \
                     FROM posts p WHERE p.reference_id = $1",
                )
                .bind(reference_id)
                .bind(reference(viewer_reference_id)),
            )
            .await?;

        row.map(|row| PostRecord::from_row(&row).map(Post::from).map_err(db_err)).transpose()
    }

    /// The viewer's own posts and those of everyone they follow, newest first.
    async fn get_feed(&self, viewer_reference_id: &str) -> DomainResult<Vec<FeedItem>> {
        let Some(viewer) = reference(viewer_reference_id) else {
            return Ok(Vec::new());
        };

        let rows = self
            .db
            .multiple(
                sqlx::query(
                    "SELECT p.reference_id AS id, m.reference_id AS media_id, p.caption, p.posted, u.username, \
                        (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS likes, \
                        EXISTS (SELECT 1 FROM post_likes l WHERE l.post_id = p.id AND l.user_id = v.id) AS has_user_liked, \
                        (p.user_id = v.id) AS is_author \
                     FROM users v \
                     JOIN posts p ON p.user_id = v.id \
                        OR p.user_id IN (SELECT f.user_id FROM user_followers f WHERE f.follower_id = v.id) \
                     JOIN users u ON u.id = p.user_id \
                     LEFT JOIN media m ON m.id = p.media_id \
                     WHERE v.reference_id = $1 \
                     ORDER BY p.posted DESC",
                )
                .bind(viewer),
            )
            .await?;

        feed(rows)
    }
}

#[derive(Clone)]
pub struct PgLikeRepository {
    db: Database,
}

impl PgLikeRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    async fn create(&self, post_id: i64, user_reference_id: &str) -> DomainResult<()> {
        self.db
            .execute(
                sqlx::query(
                    "INSERT INTO post_likes (post_id, user_id) \
                     SELECT $1, id FROM users WHERE reference_id = $2",
                )
                .bind(post_id)
                .bind(reference(user_reference_id)),
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, post_id: i64, user_reference_id: &str) -> DomainResult<()> {
        self.db
            .execute(
                sqlx::query(
                    "DELETE FROM post_likes l USING users v \
                     WHERE l.user_id = v.id AND l.post_id = $1 AND v.reference_id = $2",
                )
                .bind(post_id)
                .bind(reference(user_reference_id)),
            )
            .await?;
        Ok(())
    }
}

#[derive(FromRow)]
struct PostViewRecord {
    id: Uuid,
    media_id: Option<Uuid>,
    posted: DateTime<Utc>,
    username: String,
    caption: String,
    likes: i64,
    has_liked: bool,
}

#[derive(Clone)]
pub struct PgPostProvider {
    db: Database,
}

impl PgPostProvider {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostProvider for PgPostProvider {
    async fn get(
        &self,
        post_reference_id: &str,
        viewer_reference_id: &str,
    ) -> DomainResult<Option<PostView>> {
        let Some(post) = reference(post_reference_id) else {
            return Ok(None);
        };

        let row = self
            .db
            .single(
                sqlx::query(
                    "SELECT p.reference_id AS id, m.reference_id AS media_id, p.posted, u.username, p.caption, \
                        (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS likes, \
                        EXISTS (SELECT 1 FROM post_likes l \
                                JOIN users v ON v.id = l.user_id \
                                WHERE l.post_id = p.id AND v.reference_id = $2) AS has_liked \
                     FROM posts p \
                     JOIN users u ON u.id = p.user_id \
                     LEFT JOIN media m ON m.id = p.media_id \
                     WHERE p.reference_id = $1",
                )
                .bind(post)
                .bind(reference(viewer_reference_id)),
            )
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let r = PostViewRecord::from_row(&row).map_err(db_err)?;

        Ok(Some(PostView {
            id: r.id.to_string(),
            media_id: r.media_id.map(|id| id.to_string()),
            posted: r.posted,
            username: r.username,
            caption: r.caption,
            likes: r.likes,
            has_liked: r.has_liked,
        }))
    }

    async fn get_profile_feed(&self, username: &str, viewer_reference_id: Uuid) -> DomainResult<Vec<FeedItem>> {
        let rows = self
            .db
            .multiple(
                sqlx::query(
                    "SELECT p.reference_id AS id, m.reference_id AS media_id, p.caption, p.posted, u.username, \
                        (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS likes, \
                        EXISTS (SELECT 1 FROM post_likes l \
                                JOIN users v ON v.id = l.user_id \
                                WHERE l.post_id = p.id AND v.reference_id = $2) AS has_user_liked, \
                        (u.reference_id = $2) AS is_author \
                     FROM posts p \
                     JOIN users u ON u.id = p.user_id \
                     LEFT JOIN media m ON m.id = p.media_id \
                     WHERE u.username = $1 \
                     ORDER BY p.posted DESC",
                )
                .bind(username.to_lowercase())
                .bind(viewer_reference_id),
            )
            .await?;

        feed(rows)
    }
}
