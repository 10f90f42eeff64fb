//! Public routes of the backend gateway. Everything except registration and
//! token issuance runs behind [`crate::middleware::Authentication`] and reads
//! the caller from [`Caller`].

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use domains::dto::{AccessToken, Credentials, FeedItem, Info, PostCreated, PostView, ProfileWithFeed, RegisterResponse};
use domains::DomainError;
use services::gateway::Upload;
use services::Gateway;

use crate::error::{ApiError, ApiResult, JsonBody, PathParams};
use crate::middleware::Caller;

pub const REGISTER_PATH: &str = "/auth/register";
pub const TOKEN_PATH: &str = "/auth/token";
pub const MAX_UPLOAD_BYTES: usize = 10 << 20;

type Backend = State<Arc<Gateway>>;

pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route(REGISTER_PATH, post(register))
        .route(TOKEN_PATH, post(token))
        .route("/me", get(me))
        .route("/feed", get(feed))
        .route("/profile/{username}", get(profile))
        .route("/posts", post(create_post).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)))
        .route("/posts/{post_reference_id}", get(get_post))
        .route("/posts/like/{post_reference_id}", post(like))
        .route("/posts/unlike/{post_reference_id}", post(unlike))
        .route("/users/follow/{user_reference_id}", post(follow))
        .route("/users/unfollow/{user_reference_id}", post(unfollow))
        .with_state(gateway)
}

async fn register(
    State(gateway): Backend,
    JsonBody(credentials): JsonBody<Credentials>,
) -> ApiResult<Json<RegisterResponse>> {
    Ok(Json(gateway.register(&credentials).await?))
}

async fn token(State(gateway): Backend, JsonBody(credentials): JsonBody<Credentials>) -> ApiResult<Json<AccessToken>> {
    Ok(Json(gateway.token(&credentials).await?))
}

async fn me(State(gateway): Backend, caller: Caller) -> ApiResult<Json<Info>> {
    Ok(Json(gateway.me(caller.uid()?).await?))
}

async fn feed(State(gateway): Backend, caller: Caller) -> ApiResult<Json<Vec<FeedItem>>> {
    Ok(Json(gateway.feed(caller.uid()?).await?))
}

async fn profile(
    State(gateway): Backend,
    caller: Caller,
    PathParams(username): PathParams<String>,
) -> ApiResult<Json<ProfileWithFeed>> {
    Ok(Json(gateway.profile(&username, caller.uid()?).await?))
}

async fn create_post(State(gateway): Backend, caller: Caller, mut form: Multipart) -> ApiResult<Json<PostCreated>> {
    let mut caption = String::new();
    let mut upload = None;

    while let Some(field) = form.next_field().await.map_err(bad_form)? {
        match field.name().map(str::to_owned).as_deref() {
            Some("caption") => caption = field.text().await.map_err(bad_form)?,
            Some("file") => {
                let file_name = field.file_name().filter(|name| !name.is_empty()).map(str::to_owned);
                let content = field.bytes().await.map_err(bad_form)?;
                if !content.is_empty() {
                    upload = Some(Upload { file_name, content: content.to_vec() });
                }
            }
            _ => {}
        }
    }

    Ok(Json(gateway.create_post(caller.uid()?, &caption, upload).await?))
}

async fn get_post(
    State(gateway): Backend,
    caller: Caller,
    PathParams(post_reference_id): PathParams<String>,
) -> ApiResult<Json<PostView>> {
    Ok(Json(gateway.get_post(&post_reference_id, caller.uid()?).await?))
}

async fn like(
    State(gateway): Backend,
    caller: Caller,
    PathParams(post_reference_id): PathParams<String>,
) -> ApiResult<StatusCode> {
    gateway.like(&post_reference_id, caller.uid()?).await?;
    Ok(StatusCode::OK)
}

async fn unlike(
    State(gateway): Backend,
    caller: Caller,
    PathParams(post_reference_id): PathParams<String>,
) -> ApiResult<StatusCode> {
    gateway.unlike(&post_reference_id, caller.uid()?).await?;
    Ok(StatusCode::OK)
}

async fn follow(
    State(gateway): Backend,
    caller: Caller,
    PathParams(user_reference_id): PathParams<String>,
) -> ApiResult<StatusCode> {
    gateway.follow(&user_reference_id, caller.uid()?).await?;
    Ok(StatusCode::OK)
}

async fn unfollow(
    State(gateway): Backend,
    caller: Caller,
    PathParams(user_reference_id): PathParams<String>,
) -> ApiResult<StatusCode> {
    gateway.unfollow(&user_reference_id, caller.uid()?).await?;
    Ok(StatusCode::OK)
}

fn bad_form(err: MultipartError) -> ApiError {
    DomainError::validation(err.body_text()).into()
}
