//! # S3ObjectStore
//!
//! Objects live in one bucket, keyed by media reference id. Credentials and
//! region come from the standard AWS environment.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use domains::ports::ObjectStore;
use domains::{DomainError, DomainResult};

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), bucket)
    }

    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self { client, bucket: bucket.into() }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(&self, key: &str, content: Vec<u8>) -> DomainResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(content))
            .send()
            .await
            .map_err(|err| DomainError::internal(DisplayErrorContext(err)))?;

        Ok(())
    }

    async fn download(&self, key: &str) -> DomainResult<Vec<u8>> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| DomainError::internal(DisplayErrorContext(err)))?;

        let data = object.body.collect().await.map_err(DomainError::internal)?;
        Ok(data.into_bytes().to_vec())
    }
}
