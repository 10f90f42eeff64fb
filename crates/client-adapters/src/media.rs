//! Client for the media service.

use async_trait::async_trait;
use domains::dto::{CreateMediaResponse, MediaContent};
use domains::ports::MediaApi;
use domains::DomainResult;

use crate::error::ClientError;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct MediaClient {
    http: HttpClient,
}

impl MediaClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self { http: HttpClient::new(base_url)? })
    }
}

#[async_trait]
impl MediaApi for MediaClient {
    async fn create(&self, request: &MediaContent) -> DomainResult<CreateMediaResponse> {
        Ok(self.http.post("media", request).await?)
    }

    async fn get_content(&self, reference_id: &str) -> DomainResult<MediaContent> {
        Ok(self.http.get_segments(&["media", "content", reference_id]).await?)
    }
}
