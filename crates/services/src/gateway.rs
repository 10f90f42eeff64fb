//! # Gateway
//!
//! Use cases of the public backend. Every call acts on behalf of the caller
//! identified by the `uid` claim and is forwarded to the owning service.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use domains::dto::{
    AccessToken, CreatePostRequest, Credentials, FeedItem, FollowRequest, Info, LikeRequest,
    MediaContent, PostCreated, PostView, ProfileWithFeed, RegisterResponse,
};
use domains::ports::{AuthApi, MediaApi, PostsApi, UsersApi};
use domains::DomainResult;

/// A file received with a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content: Vec<u8>,
}

pub struct Gateway {
    users: Arc<dyn UsersApi>,
    posts: Arc<dyn PostsApi>,
    media: Arc<dyn MediaApi>,
    auth: Arc<dyn AuthApi>,
}

impl Gateway {
    pub fn new(
        users: Arc<dyn UsersApi>,
        posts: Arc<dyn PostsApi>,
        media: Arc<dyn MediaApi>,
        auth: Arc<dyn AuthApi>,
    ) -> Self {
        Self { users, posts, media, auth }
    }

    /// Creates the user, then tries to log them in. A token failure does not
    /// fail the registration; the response simply carries no token.
    pub async fn register(&self, credentials: &Credentials) -> DomainResult<RegisterResponse> {
        let user = self.users.create(credentials).await?;

        let access_token = match self.auth.generate_token(credentials).await {
            Ok(token) => Some(token),
            Err(err) => {
                tracing::warn!(username = %user.username, error = %err, "token for new user failed");
                None
            }
        };

        Ok(RegisterResponse {
            reference_id: user.reference_id,
            username: user.username,
            access_token,
        })
    }

    pub async fn token(&self, credentials: &Credentials) -> DomainResult<AccessToken> {
        self.auth.generate_token(credentials).await
    }

    pub async fn me(&self, uid: &str) -> DomainResult<Info> {
        self.users.get_info(uid).await
    }

    pub async fn feed(&self, uid: &str) -> DomainResult<Vec<FeedItem>> {
        self.posts.get_feed(uid).await
    }

    pub async fn profile(&self, username: &str, uid: &str) -> DomainResult<ProfileWithFeed> {
        let profile = self.users.get_profile(username, uid).await?;
        let feed = self.posts.get_profile_feed(username, uid).await?;

        Ok(ProfileWithFeed { profile, feed })
    }

    /// Uploads the file first, if any. When the post itself is then rejected
    /// the media row is left behind.
    pub async fn create_post(&self, uid: &str, caption: &str, upload: Option<Upload>) -> DomainResult<PostCreated> {
        let media_id = match upload {
            Some(upload) => {
                let content_type = sniff_content_type(&upload.content, upload.file_name.as_deref());
                let created = self
                    .media
                    .create(&MediaContent { content_type, content: STANDARD.encode(&upload.content) })
                    .await?;
                Some(created.id)
            }
            None => None,
        };

        let post = self
            .posts
            .create(&CreatePostRequest {
                user_reference_id: uid.to_owned(),
                media_id,
                caption: caption.to_owned(),
            })
            .await?;

        Ok(PostCreated { id: post.reference_id })
    }

    pub async fn get_post(&self, post_reference_id: &str, uid: &str) -> DomainResult<PostView> {
        self.posts.get(post_reference_id, uid).await
    }

    pub async fn like(&self, post_reference_id: &str, uid: &str) -> DomainResult<()> {
        self.posts.like(&like_request(post_reference_id, uid)).await
    }

    pub async fn unlike(&self, post_reference_id: &str, uid: &str) -> DomainResult<()> {
        self.posts.unlike(&like_request(post_reference_id, uid)).await
    }

    pub async fn follow(&self, user_reference_id: &str, uid: &str) -> DomainResult<()> {
        self.users.follow(&follow_request(user_reference_id, uid)).await
    }

    pub async fn unfollow(&self, user_reference_id: &str, uid: &str) -> DomainResult<()> {
        self.users.unfollow(&follow_request(user_reference_id, uid)).await
    }
}

fn like_request(post_reference_id: &str, uid: &str) -> LikeRequest {
    LikeRequest { post_reference_id: post_reference_id.to_owned(), user_reference_id: uid.to_owned() }
}

fn follow_request(user_reference_id: &str, uid: &str) -> FollowRequest {
    FollowRequest { user_reference_id: user_reference_id.to_owned(), follower_reference_id: uid.to_owned() }
}

/// Detects the type from the bytes, falling back to the file extension.
pub fn sniff_content_type(content: &[u8], file_name: Option<&str>) -> String {
    if let Ok(format) = image::guess_format(content) {
        return format.to_mime_type().to_owned();
    }

    file_name
        .and_then(|name| mime_guess::from_path(name).first())
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
        .essence_str()
        .to_owned()
}
