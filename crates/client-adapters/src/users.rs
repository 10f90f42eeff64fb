//! Client for the users service.

use async_trait::async_trait;
use domains::claims::Claims;
use domains::dto::{ClaimsResponse, CreateUserResponse, Credentials, FollowRequest, IdResponse, Info, Profile};
use domains::ports::UsersApi;
use domains::DomainResult;

use crate::error::ClientError;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct UsersClient {
    http: HttpClient,
}

impl UsersClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self { http: HttpClient::new(base_url)? })
    }
}

#[async_trait]
impl UsersApi for UsersClient {
    async fn create(&self, credentials: &Credentials) -> DomainResult<CreateUserResponse> {
        Ok(self.http.post("users", credentials).await?)
    }

    async fn get_claims(&self, credentials: &Credentials) -> DomainResult<Claims> {
        let response: ClaimsResponse = self.http.post("claims", credentials).await?;
        Ok(response.claims)
    }

    async fn get_id_by_reference(&self, reference_id: &str) -> DomainResult<i64> {
        let response: IdResponse = self.http.get_segments(&["users", "id", reference_id]).await?;
        Ok(response.id)
    }

    async fn get_profile(&self, username: &str, user_reference_id: &str) -> DomainResult<Profile> {
        Ok(self.http.get_segments(&["profile", username, user_reference_id]).await?)
    }

    async fn get_info(&self, user_reference_id: &str) -> DomainResult<Info> {
        Ok(self.http.get_segments(&["info", user_reference_id]).await?)
    }

    async fn follow(&self, request: &FollowRequest) -> DomainResult<()> {
        Ok(self.http.post_empty("follow", request).await?)
    }

    async fn unfollow(&self, request: &FollowRequest) -> DomainResult<()> {
        Ok(self.http.post_empty("unfollow", request).await?)
    }
}
