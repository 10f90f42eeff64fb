//! # PostService
//!
//! Post creation, feeds and the like/unlike transitions for the posts process.

use std::sync::Arc;

use domains::dto::{CreatePostRequest, CreatePostResponse, FeedItem, LikeRequest, PostView};
use domains::models::Post;
use domains::ports::{LikeRepository, PostProvider, PostRepository, UsersApi};
use domains::{DomainError, DomainResult};

pub const POST_NOT_FOUND: &str = "post not found";

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    likes: Arc<dyn LikeRepository>,
    provider: Arc<dyn PostProvider>,
    users: Arc<dyn UsersApi>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        likes: Arc<dyn LikeRepository>,
        provider: Arc<dyn PostProvider>,
        users: Arc<dyn UsersApi>,
    ) -> Self {
        Self { posts, likes, provider, users }
    }

    /// Resolves the author's internal id through the users service, so an
    /// unknown author surfaces with that service's status.
    pub async fn create(&self, request: &CreatePostRequest) -> DomainResult<CreatePostResponse> {
        let user_id = self.users.get_id_by_reference(&request.user_reference_id).await?;
        let post = Post::new(user_id, request.media_id, &request.caption)?;
        let post = self.posts.create(&post).await?;

        Ok(CreatePostResponse { reference_id: post.reference_id })
    }

    pub async fn get_feed(&self, viewer_reference_id: &str) -> DomainResult<Vec<FeedItem>> {
        self.posts.get_feed(viewer_reference_id).await
    }

    pub async fn get(&self, post_reference_id: &str, viewer_reference_id: &str) -> DomainResult<PostView> {
        self.provider
            .get(post_reference_id, viewer_reference_id)
            .await?
            .ok_or_else(|| DomainError::not_found(POST_NOT_FOUND))
    }

    pub async fn get_profile_feed(
        &self,
        username: &str,
        viewer_reference_id: &str,
    ) -> DomainResult<Vec<FeedItem>> {
        let viewer = uuid::Uuid::parse_str(viewer_reference_id)
            .map_err(|_| DomainError::validation("user reference id must be a valid guid"))?;

        self.provider.get_profile_feed(username, viewer).await
    }

    pub async fn like(&self, request: &LikeRequest) -> DomainResult<()> {
        let post = self.load(request).await?;
        post.can_like()?;
        self.likes.create(post.id, &request.user_reference_id).await
    }

    pub async fn unlike(&self, request: &LikeRequest) -> DomainResult<()> {
        let post = self.load(request).await?;
        post.can_unlike()?;
        self.likes.delete(post.id, &request.user_reference_id).await
    }

    async fn load(&self, request: &LikeRequest) -> DomainResult<Post> {
        self.posts
            .get(&request.post_reference_id, &request.user_reference_id)
            .await?
            .ok_or_else(|| DomainError::not_found(POST_NOT_FOUND))
    }
}
