//! Client for the auth service.

use async_trait::async_trait;
use domains::dto::{AccessToken, Credentials};
use domains::ports::AuthApi;
use domains::DomainResult;

use crate::error::ClientError;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct AuthClient {
    http: HttpClient,
}

impl AuthClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self { http: HttpClient::new(base_url)? })
    }
}

#[async_trait]
impl AuthApi for AuthClient {
    async fn generate_token(&self, credentials: &Credentials) -> DomainResult<AccessToken> {
        Ok(self.http.post("token", credentials).await?)
    }
}
