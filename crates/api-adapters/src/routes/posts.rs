use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use domains::dto::{CreatePostRequest, CreatePostResponse, FeedItem, LikeRequest, PostView};
use services::PostService;

use crate::error::{ApiResult, JsonBody, PathParams};

type Posts = State<Arc<PostService>>;

pub fn router(service: Arc<PostService>) -> Router {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/like", post(like))
        .route("/posts/unlike", post(unlike))
        .route("/posts/{post_reference_id}/{user_reference_id}", get(get_post))
        .route("/feed/{user_reference_id}", get(get_feed))
        .route("/profile/feed/{username}/{user_reference_id}", get(get_profile_feed))
        .with_state(service)
}

async fn create_post(
    State(service): Posts,
    JsonBody(request): JsonBody<CreatePostRequest>,
) -> ApiResult<Json<CreatePostResponse>> {
    Ok(Json(service.create(&request).await?))
}

async fn get_feed(State(service): Posts, PathParams(viewer): PathParams<String>) -> ApiResult<Json<Vec<FeedItem>>> {
    Ok(Json(service.get_feed(&viewer).await?))
}

async fn get_post(
    State(service): Posts,
    PathParams((post_reference_id, viewer)): PathParams<(String, String)>,
) -> ApiResult<Json<PostView>> {
    Ok(Json(service.get(&post_reference_id, &viewer).await?))
}

async fn get_profile_feed(
    State(service): Posts,
    PathParams((username, viewer)): PathParams<(String, String)>,
) -> ApiResult<Json<Vec<FeedItem>>> {
    Ok(Json(service.get_profile_feed(&username, &viewer).await?))
}

async fn like(State(service): Posts, JsonBody(request): JsonBody<LikeRequest>) -> ApiResult<StatusCode> {
    service.like(&request).await?;
    Ok(StatusCode::OK)
}

async fn unlike(State(service): Posts, JsonBody(request): JsonBody<LikeRequest>) -> ApiResult<StatusCode> {
    service.unlike(&request).await?;
    Ok(StatusCode::OK)
}
