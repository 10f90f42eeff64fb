use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use domains::dto::{CreateMediaResponse, MediaContent};
use services::MediaService;

use crate::error::{ApiResult, JsonBody, PathParams};

/// Base64 inflates uploads by a third; leave room for a 10 MiB file.
pub const MAX_BODY_BYTES: usize = 16 << 20;

pub fn router(service: Arc<MediaService>) -> Router {
    Router::new()
        .route("/media", post(create_media).layer(DefaultBodyLimit::max(MAX_BODY_BYTES)))
        .route("/media/content/{reference_id}", get(get_content))
        .with_state(service)
}

async fn create_media(
    State(service): State<Arc<MediaService>>,
    JsonBody(request): JsonBody<MediaContent>,
) -> ApiResult<Json<CreateMediaResponse>> {
    Ok(Json(service.create(&request).await?))
}

async fn get_content(
    State(service): State<Arc<MediaService>>,
    PathParams(reference_id): PathParams<String>,
) -> ApiResult<Json<MediaContent>> {
    Ok(Json(service.get_content(&reference_id).await?))
}
