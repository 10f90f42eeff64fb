use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use services::DownloadService;

use crate::error::{ApiResult, PathParams};

pub const CACHE_POLICY: &str = "private, max-age=3600";

pub fn router(service: Arc<DownloadService>) -> Router {
    Router::new().route("/{reference_id}", get(download)).with_state(service)
}

async fn download(
    State(service): State<Arc<DownloadService>>,
    PathParams(reference_id): PathParams<String>,
) -> ApiResult<impl IntoResponse> {
    let download = service.download(&reference_id).await?;

    Ok((
        [(CONTENT_TYPE, download.content_type), (CACHE_CONTROL, CACHE_POLICY.to_owned())],
        download.content,
    ))
}
