//! # media
//!
//! Media metadata in postgres, bytes in the object store. The local
//! filesystem store is used unless built with `media-s3`.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::middleware::Logging;
use api_adapters::routes::media;
use api_adapters::{telemetry, App};
use configs::{LogFormat, Settings};
use domains::ports::{HealthCheck, MediaRepository, ObjectStore};
use services::{Container, MediaService, ServiceKey};
use storage_adapters::postgres::{Database, DatabaseHealthCheck, PgMediaRepository};

const DATABASE: ServiceKey<Database> = ServiceKey::new("Database");
const OBJECT_STORE: ServiceKey<dyn ObjectStore> = ServiceKey::new("ObjectStore");
const MEDIA_REPOSITORY: ServiceKey<dyn MediaRepository> = ServiceKey::new("MediaRepository");
const MEDIA_SERVICE: ServiceKey<MediaService> = ServiceKey::new("MediaService");
const HEALTH: ServiceKey<dyn HealthCheck> = ServiceKey::new("HealthCheck");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    telemetry::init(settings.log_format == LogFormat::Json);

    if let Err(err) = run(settings).await {
        tracing::error!(error = ?err, "media service failed");
        return Err(err);
    }

    Ok(())
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = object_store(&settings).await?;

    let db = Database::connect(settings.connection_string()?)
        .await
        .context("connecting to postgres")?;
    db.migrate().await.context("running migrations")?;

    let mut container = Container::new();
    container.add_singleton(DATABASE, move |_| Arc::new(db.clone()));
    container.add_singleton(OBJECT_STORE, move |_| Arc::clone(&store));
    container.add_singleton(MEDIA_REPOSITORY, |ctn| {
        Arc::new(PgMediaRepository::new((*ctn.get(DATABASE)).clone())) as Arc<dyn MediaRepository>
    });
    container.add_singleton(HEALTH, |ctn| {
        Arc::new(DatabaseHealthCheck::new((*ctn.get(DATABASE)).clone())) as Arc<dyn HealthCheck>
    });
    container.add_service(MEDIA_SERVICE, |ctn| {
        Arc::new(MediaService::new(ctn.get(MEDIA_REPOSITORY), ctn.get(OBJECT_STORE)))
    });

    App::new(settings.port)
        .routes(media::router(container.get(MEDIA_SERVICE)))
        .middleware(Logging)
        .health_check(container.get(HEALTH))
        .serve()
        .await?;

    Ok(())
}

#[cfg(feature = "media-s3")]
async fn object_store(settings: &Settings) -> anyhow::Result<Arc<dyn ObjectStore>> {
    let bucket = configs::require(&settings.media_bucket, "MEDIA_BUCKET")?;
    tracing::info!(bucket = %bucket, "storing media in s3");
    Ok(Arc::new(storage_adapters::s3::S3ObjectStore::from_env(bucket.clone()).await))
}

#[cfg(not(feature = "media-s3"))]
async fn object_store(settings: &Settings) -> anyhow::Result<Arc<dyn ObjectStore>> {
    tracing::info!(root = %settings.media_root.display(), "storing media on disk");
    Ok(Arc::new(storage_adapters::local::LocalObjectStore::new(settings.media_root.clone())))
}
