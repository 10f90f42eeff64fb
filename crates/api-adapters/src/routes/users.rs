use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use domains::dto::{ClaimsResponse, CreateUserResponse, Credentials, FollowRequest, IdResponse, Info, Profile};
use services::UserService;

use crate::error::{ApiResult, JsonBody, PathParams};

type Users = State<Arc<UserService>>;

pub fn router(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/id/{reference_id}", get(get_id))
        .route("/claims", post(get_claims))
        .route("/profile/{username}/{user_reference_id}", get(get_profile))
        .route("/info/{user_reference_id}", get(get_info))
        .route("/follow", post(follow))
        .route("/unfollow", post(unfollow))
        .with_state(service)
}

async fn create_user(
    State(service): Users,
    JsonBody(credentials): JsonBody<Credentials>,
) -> ApiResult<Json<CreateUserResponse>> {
    Ok(Json(service.create_user(&credentials).await?))
}

async fn get_id(State(service): Users, PathParams(reference_id): PathParams<String>) -> ApiResult<Json<IdResponse>> {
    let id = service.get_id_by_reference(&reference_id).await?;
    Ok(Json(IdResponse { id }))
}

async fn get_claims(
    State(service): Users,
    JsonBody(credentials): JsonBody<Credentials>,
) -> ApiResult<Json<ClaimsResponse>> {
    let claims = service.get_claims(&credentials).await?;
    Ok(Json(ClaimsResponse { claims }))
}

async fn get_profile(
    State(service): Users,
    PathParams((username, viewer)): PathParams<(String, String)>,
) -> ApiResult<Json<Profile>> {
    Ok(Json(service.get_profile(&username, &viewer).await?))
}

async fn get_info(State(service): Users, PathParams(reference_id): PathParams<String>) -> ApiResult<Json<Info>> {
    Ok(Json(service.get_info(&reference_id).await?))
}

async fn follow(State(service): Users, JsonBody(request): JsonBody<FollowRequest>) -> ApiResult<StatusCode> {
    service.follow(&request).await?;
    Ok(StatusCode::OK)
}

async fn unfollow(State(service): Users, JsonBody(request): JsonBody<FollowRequest>) -> ApiResult<StatusCode> {
    service.unfollow(&request).await?;
    Ok(StatusCode::OK)
}
