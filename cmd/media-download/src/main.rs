//! # media-download
//!
//! Serves raw media bytes by reference id, fetched from the media service.

use std::sync::Arc;

use api_adapters::middleware::Logging;
use api_adapters::routes::download;
use api_adapters::{telemetry, App};
use client_adapters::MediaClient;
use configs::{require, LogFormat, Settings};
use domains::ports::MediaApi;
use services::{Container, DownloadService, ServiceKey};

const MEDIA_API: ServiceKey<dyn MediaApi> = ServiceKey::new("MediaApi");
const DOWNLOAD_SERVICE: ServiceKey<DownloadService> = ServiceKey::new("DownloadService");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    telemetry::init(settings.log_format == LogFormat::Json);

    if let Err(err) = run(settings).await {
        tracing::error!(error = ?err, "media-download failed");
        return Err(err);
    }

    Ok(())
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let media: Arc<dyn MediaApi> = Arc::new(MediaClient::new(require(&settings.media_api_url, "MEDIA_API_URL")?)?);

    let mut container = Container::new();
    container.add_singleton(MEDIA_API, move |_| Arc::clone(&media));
    container.add_service(DOWNLOAD_SERVICE, |ctn| Arc::new(DownloadService::new(ctn.get(MEDIA_API))));

    App::new(settings.port)
        .routes(download::router(container.get(DOWNLOAD_SERVICE)))
        .middleware(Logging)
        .serve()
        .await?;

    Ok(())
}
