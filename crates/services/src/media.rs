//! # Media
//!
//! [`MediaService`] stores uploads for the media process. The media row is
//! inserted inside a transaction that stays open while the bytes are uploaded,
//! and is committed only when the upload succeeds.
//!
//! [`DownloadService`] serves raw bytes for the media-download process by
//! asking the media process for the base64 payload.

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use domains::dto::{CreateMediaResponse, MediaContent};
use domains::models::Media;
use domains::ports::{MediaApi, MediaRepository, ObjectStore};
use domains::{DomainError, DomainResult};

pub const MEDIA_NOT_FOUND: &str = "media not found";

/// Applied to every object store call.
pub const OBJECT_STORE_TIMEOUT: Duration = Duration::from_secs(30);

pub struct MediaService {
    media: Arc<dyn MediaRepository>,
    store: Arc<dyn ObjectStore>,
    timeout: Duration,
}

impl MediaService {
    pub fn new(media: Arc<dyn MediaRepository>, store: Arc<dyn ObjectStore>) -> Self {
        Self { media, store, timeout: OBJECT_STORE_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn create(&self, request: &MediaContent) -> DomainResult<CreateMediaResponse> {
        let media = Media::new(&request.content_type)?;
        let content = STANDARD
            .decode(&request.content)
            .map_err(|_| DomainError::validation("content must be valid base64"))?;

        let (media, pending) = self.media.create(&media).await?;

        let uploaded = match tokio::time::timeout(self.timeout, self.store.upload(media.object_key(), content)).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::internal("upload timed out")),
        };

        if let Err(err) = uploaded {
            tracing::error!(reference_id = %media.reference_id, error = %err, "media upload failed");
            if let Err(rollback) = pending.complete(false).await {
                tracing::error!(error = %rollback, "media rollback failed");
            }
            return Err(DomainError::Internal(err.to_string()));
        }

        pending.complete(true).await?;

        Ok(CreateMediaResponse { id: media.id, reference_id: media.reference_id })
    }

    pub async fn get_content(&self, reference_id: &str) -> DomainResult<MediaContent> {
        let content_type = self
            .media
            .get_content_type(reference_id)
            .await?
            .ok_or_else(|| DomainError::not_found(MEDIA_NOT_FOUND))?;

        let content = match tokio::time::timeout(self.timeout, self.store.download(reference_id)).await {
            Ok(result) => result?,
            Err(_) => return Err(DomainError::internal("download timed out")),
        };

        Ok(MediaContent { content_type, content: STANDARD.encode(content) })
    }
}

/// Decoded media ready to be written as a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub content_type: String,
    pub content: Vec<u8>,
}

pub struct DownloadService {
    media: Arc<dyn MediaApi>,
}

impl DownloadService {
    pub fn new(media: Arc<dyn MediaApi>) -> Self {
        Self { media }
    }

    /// Every failure is reported as not found.
    pub async fn download(&self, reference_id: &str) -> DomainResult<Download> {
        let fetched = self.media.get_content(reference_id).await.and_then(|media| {
            let content = STANDARD.decode(&media.content).map_err(DomainError::internal)?;
            Ok(Download { content_type: media.content_type, content })
        });

        fetched.map_err(|err| {
            tracing::error!(reference_id, error = %err, "media download failed");
            DomainError::not_found(MEDIA_NOT_FOUND)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use domains::ports::{MockMediaApi, MockMediaRepository, MockObjectStore, PendingWrite};
    use mockall::predicate::eq;

    fn recording_repo(outcome: Arc<Mutex<Vec<bool>>>) -> MockMediaRepository {
        let mut repo = MockMediaRepository::new();
        repo.expect_create().times(1).returning(move |media| {
            let outcome = Arc::clone(&outcome);
            let stored = Media::from_parts(5, "media-ref".into(), media.content_type().into());
            let pending = PendingWrite::new(move |commit| async move {
                outcome.lock().unwrap().push(commit);
                Ok(())
            });
            Ok((stored, pending))
        });
        repo
    }

    fn png_request() -> MediaContent {
        MediaContent { content_type: "image/png".into(), content: STANDARD.encode(b"png-bytes") }
    }

    #[tokio::test]
    async fn failed_upload_rolls_back_and_is_internal() {
        let outcome = Arc::new(Mutex::new(Vec::new()));
        let mut store = MockObjectStore::new();
        store.expect_upload().returning(|_, _| Err(DomainError::internal("bucket unavailable")));

        let svc = MediaService::new(Arc::new(recording_repo(Arc::clone(&outcome))), Arc::new(store));
        let err = svc.create(&png_request()).await.unwrap_err();

        assert_eq!(err.status(), 500);
        assert_eq!(*outcome.lock().unwrap(), vec![false]);
    }

    #[tokio::test]
    async fn successful_upload_commits() {
        let outcome = Arc::new(Mutex::new(Vec::new()));
        let mut store = MockObjectStore::new();
        store
            .expect_upload()
            .with(eq("media-ref"), eq(b"png-bytes".to_vec()))
            .times(1)
            .returning(|_, _| Ok(()));

        let svc = MediaService::new(Arc::new(recording_repo(Arc::clone(&outcome))), Arc::new(store));
        let created = svc.create(&png_request()).await.unwrap();

        assert_eq!(created, CreateMediaResponse { id: 5, reference_id: "media-ref".into() });
        assert_eq!(*outcome.lock().unwrap(), vec![true]);
    }

    #[tokio::test]
    async fn disallowed_type_never_reaches_the_store() {
        let mut repo = MockMediaRepository::new();
        repo.expect_create().never();

        let svc = MediaService::new(Arc::new(repo), Arc::new(MockObjectStore::new()));
        let err = svc
            .create(&MediaContent { content_type: "image/gif".into(), content: String::new() })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "the content type 'image/gif' is not allowed");
    }

    #[tokio::test]
    async fn get_content_of_unknown_media_is_not_found() {
        let mut repo = MockMediaRepository::new();
        repo.expect_get_content_type().returning(|_| Ok(None));
        let mut store = MockObjectStore::new();
        store.expect_download().never();

        let svc = MediaService::new(Arc::new(repo), Arc::new(store));
        let err = svc.get_content("nope").await.unwrap_err();
        assert_eq!(err, DomainError::not_found(MEDIA_NOT_FOUND));
    }

    #[tokio::test]
    async fn get_content_encodes_the_stored_bytes() {
        let mut repo = MockMediaRepository::new();
        repo.expect_get_content_type().returning(|_| Ok(Some("image/jpeg".into())));
        let mut store = MockObjectStore::new();
        store.expect_download().with(eq("ref")).returning(|_| Ok(vec![1, 2, 3]));

        let svc = MediaService::new(Arc::new(repo), Arc::new(store));
        let content = svc.get_content("ref").await.unwrap();
        assert_eq!(content, MediaContent { content_type: "image/jpeg".into(), content: STANDARD.encode([1u8, 2, 3]) });
    }

    #[tokio::test]
    async fn download_decodes_and_hides_failures() {
        let mut api = MockMediaApi::new();
        api.expect_get_content().with(eq("ok")).returning(|_| {
            Ok(MediaContent { content_type: "image/png".into(), content: STANDARD.encode(b"abc") })
        });
        api.expect_get_content()
            .with(eq("gone"))
            .returning(|_| Err(DomainError::Upstream { status: 500, message: "boom".into() }));

        let svc = DownloadService::new(Arc::new(api));
        let download = svc.download("ok").await.unwrap();
        assert_eq!(download.content, b"abc");

        let err = svc.download("gone").await.unwrap_err();
        assert_eq!(err, DomainError::not_found(MEDIA_NOT_FOUND));
    }
}
