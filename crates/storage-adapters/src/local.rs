//! # LocalObjectStore
//!
//! Stores objects on the local filesystem under a sharded layout:
//! `root/ab/cd/<key>` where `abcd...` is the SHA-256 of the key. Keys never
//! become path components on their own, so they cannot escape the root.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use domains::ports::ObjectStore;
use domains::{DomainError, DomainResult};
use sha2::{Digest, Sha256};
use tokio::fs;

pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn sharded_path(&self, key: &str) -> PathBuf {
        let hash = hex::encode(Sha256::digest(key.as_bytes()));
        let mut path = self.root.clone();
        path.push(&hash[0..2]);
        path.push(&hash[2..4]);
        path.push(&hash);
        path
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(&self, key: &str, content: Vec<u8>) -> DomainResult<()> {
        let path = self.sharded_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(DomainError::internal)?;
        }

        fs::write(&path, content).await.map_err(DomainError::internal)?;
        tracing::debug!(key, path = %path.display(), "object stored");
        Ok(())
    }

    async fn download(&self, key: &str) -> DomainResult<Vec<u8>> {
        match fs::read(self.sharded_path(key)).await {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(DomainError::not_found(format!("object '{key}' not found")))
            }
            Err(err) => Err(DomainError::internal(err)),
        }
    }
}
