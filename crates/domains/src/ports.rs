//! # Ports
//!
//! Contracts between the use-case services and the adapters. Stores and peer
//! clients report failures as `DomainError` so the HTTP status is fixed where
//! the error is created.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::claims::Claims;
use crate::dto::{
    AccessToken, CreateMediaResponse, CreatePostRequest, CreatePostResponse, CreateUserResponse,
    Credentials, FeedItem, FollowRequest, Info, LikeRequest, MediaContent, PostView, Profile,
};
use crate::models::{Media, Post, User};
use crate::DomainResult;

type CompleteFn =
    Box<dyn FnOnce(bool) -> Pin<Box<dyn Future<Output = DomainResult<()>> + Send>> + Send>;

/// A write left open until the caller commits or rolls it back.
pub struct PendingWrite {
    complete: CompleteFn,
}

impl PendingWrite {
    pub fn new<F, Fut>(complete: F) -> Self
    where
        F: FnOnce(bool) -> Fut + Send + 'static,
        Fut: Future<Output = DomainResult<()>> + Send + 'static,
    {
        Self { complete: Box::new(move |commit| Box::pin(complete(commit))) }
    }

    /// Commits when `commit` is true, rolls back otherwise.
    pub async fn complete(self, commit: bool) -> DomainResult<()> {
        (self.complete)(commit).await
    }
}

impl std::fmt::Debug for PendingWrite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PendingWrite")
    }
}

// ── Security ────────────────────────────────────────────────────────────────

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &[u8]) -> DomainResult<Vec<u8>>;
    fn verify(&self, password: &[u8], hash: &[u8]) -> bool;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenSigner: Send + Sync {
    fn sign(&self, claims: &Claims, expires: DateTime<Utc>) -> DomainResult<String>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    /// Checks signature and expiry, returning the string claims.
    fn verify(&self, token: &str) -> DomainResult<Claims>;
}

// ── Users store ─────────────────────────────────────────────────────────────

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user and returns it with `id` and `reference_id` set.
    async fn create(&self, user: &User) -> DomainResult<User>;
    async fn does_username_exist(&self, username: &str) -> DomainResult<bool>;
    async fn get_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    /// `is_following` is computed for `viewer_reference_id`.
    async fn get_by_reference(
        &self,
        reference_id: &str,
        viewer_reference_id: &str,
    ) -> DomainResult<Option<User>>;
    async fn get_id_by_reference(&self, reference_id: &str) -> DomainResult<Option<i64>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FollowerRepository: Send + Sync {
    /// Returns the number of rows written.
    async fn create(&self, user_id: i64, follower_reference_id: &str) -> DomainResult<u64>;
    async fn delete(&self, user_id: i64, follower_reference_id: &str) -> DomainResult<u64>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserProvider: Send + Sync {
    async fn get_profile(
        &self,
        username: &str,
        viewer_reference_id: &str,
    ) -> DomainResult<Option<Profile>>;
    async fn get_info(&self, reference_id: &str) -> DomainResult<Option<Info>>;
}

// ── Posts store ─────────────────────────────────────────────────────────────

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &Post) -> DomainResult<Post>;
    /// `has_user_liked` is computed for `viewer_reference_id`.
    async fn get(&self, reference_id: &str, viewer_reference_id: &str) -> DomainResult<Option<Post>>;
    async fn get_feed(&self, viewer_reference_id: &str) -> DomainResult<Vec<FeedItem>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn create(&self, post_id: i64, user_reference_id: &str) -> DomainResult<()>;
    async fn delete(&self, post_id: i64, user_reference_id: &str) -> DomainResult<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostProvider: Send + Sync {
    async fn get(
        &self,
        post_reference_id: &str,
        viewer_reference_id: &str,
    ) -> DomainResult<Option<PostView>>;
    async fn get_profile_feed(
        &self,
        username: &str,
        viewer_reference_id: uuid::Uuid,
    ) -> DomainResult<Vec<FeedItem>>;
}

// ── Media store ─────────────────────────────────────────────────────────────

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Inserts the row inside an open transaction. The row becomes visible
    /// only once the returned write is completed with `true`.
    async fn create(&self, media: &Media) -> DomainResult<(Media, PendingWrite)>;
    async fn get_content_type(&self, reference_id: &str) -> DomainResult<Option<String>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, key: &str, content: Vec<u8>) -> DomainResult<()>;
    async fn download(&self, key: &str) -> DomainResult<Vec<u8>>;
}

// ── Health ──────────────────────────────────────────────────────────────────

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> DomainResult<()>;
}

// ── Peer services ───────────────────────────────────────────────────────────

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn create(&self, credentials: &Credentials) -> DomainResult<CreateUserResponse>;
    async fn get_claims(&self, credentials: &Credentials) -> DomainResult<Claims>;
    async fn get_id_by_reference(&self, reference_id: &str) -> DomainResult<i64>;
    async fn get_profile(&self, username: &str, user_reference_id: &str) -> DomainResult<Profile>;
    async fn get_info(&self, user_reference_id: &str) -> DomainResult<Info>;
    async fn follow(&self, request: &FollowRequest) -> DomainResult<()>;
    async fn unfollow(&self, request: &FollowRequest) -> DomainResult<()>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostsApi: Send + Sync {
    async fn create(&self, request: &CreatePostRequest) -> DomainResult<CreatePostResponse>;
    async fn get_feed(&self, user_reference_id: &str) -> DomainResult<Vec<FeedItem>>;
    async fn like(&self, request: &LikeRequest) -> DomainResult<()>;
    async fn unlike(&self, request: &LikeRequest) -> DomainResult<()>;
    async fn get(&self, post_reference_id: &str, user_reference_id: &str) -> DomainResult<PostView>;
    async fn get_profile_feed(
        &self,
        username: &str,
        user_reference_id: &str,
    ) -> DomainResult<Vec<FeedItem>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaApi: Send + Sync {
    async fn create(&self, request: &MediaContent) -> DomainResult<CreateMediaResponse>;
    async fn get_content(&self, reference_id: &str) -> DomainResult<MediaContent>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn generate_token(&self, credentials: &Credentials) -> DomainResult<AccessToken>;
}
