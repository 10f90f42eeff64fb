//! Client for the posts service.

use async_trait::async_trait;
use domains::dto::{CreatePostRequest, CreatePostResponse, FeedItem, LikeRequest, PostView};
use domains::ports::PostsApi;
use domains::DomainResult;

use crate::error::ClientError;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct PostsClient {
    http: HttpClient,
}

impl PostsClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self { http: HttpClient::new(base_url)? })
    }
}

#[async_trait]
impl PostsApi for PostsClient {
    async fn create(&self, request: &CreatePostRequest) -> DomainResult<CreatePostResponse> {
        Ok(self.http.post("posts", request).await?)
    }

    async fn get_feed(&self, user_reference_id: &str) -> DomainResult<Vec<FeedItem>> {
        Ok(self.http.get_segments(&["feed", user_reference_id]).await?)
    }

    async fn like(&self, request: &LikeRequest) -> DomainResult<()> {
        Ok(self.http.post_empty("posts/like", request).await?)
    }

    async fn unlike(&self, request: &LikeRequest) -> DomainResult<()> {
        Ok(self.http.post_empty("posts/unlike", request).await?)
    }

    async fn get(&self, post_reference_id: &str, user_reference_id: &str) -> DomainResult<PostView> {
        Ok(self.http.get_segments(&["posts", post_reference_id, user_reference_id]).await?)
    }

    async fn get_profile_feed(&self, username: &str, user_reference_id: &str) -> DomainResult<Vec<FeedItem>> {
        Ok(self.http.get_segments(&["profile", "feed", username, user_reference_id]).await?)
    }
}
