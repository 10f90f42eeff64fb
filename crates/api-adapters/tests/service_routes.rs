use std::sync::Arc;

use api_adapters::routes::{download, media, posts, users};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use domains::dto::MediaContent;
use domains::models::user::User;
use domains::password::PasswordPolicy;
use domains::ports::{
    MockFollowerRepository, MockLikeRepository, MockMediaApi, MockMediaRepository, MockObjectStore,
    MockPasswordHasher, MockPostProvider, MockPostRepository, MockUserProvider, MockUserRepository, MockUsersApi,
};
use domains::DomainError;
use mockall::predicate::eq;
use services::{DownloadService, MediaService, PostService, UserService};
use tower::ServiceExt;

fn users_router(repo: MockUserRepository, followers: MockFollowerRepository) -> Router {
    users::router(Arc::new(UserService::new(
        Arc::new(repo),
        Arc::new(followers),
        Arc::new(MockUserProvider::new()),
        Arc::new(MockPasswordHasher::new()),
        PasswordPolicy::default(),
    )))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let router = users_router(MockUserRepository::new(), MockFollowerRepository::new());

    let response = router
        .oneshot(
            Request::post("/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"username\":"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(response).await["message"].is_string());
}

#[tokio::test]
async fn unknown_username_yields_400_on_claims() {
    let mut repo = MockUserRepository::new();
    repo.expect_get_by_username().with(eq("ghost")).returning(|_| Ok(None));

    let response = users_router(repo, MockFollowerRepository::new())
        .oneshot(post_json("/claims", serde_json::json!({ "username": "Ghost", "password": "x" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await, serde_json::json!({ "message": "user not found" }));
}

#[tokio::test]
async fn internal_id_is_served_by_reference() {
    let mut repo = MockUserRepository::new();
    repo.expect_get_id_by_reference().with(eq("user-ref")).returning(|_| Ok(Some(7)));

    let response = users_router(repo, MockFollowerRepository::new())
        .oneshot(Request::get("/users/id/user-ref").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, serde_json::json!({ "id": 7 }));
}

#[tokio::test]
async fn following_twice_is_rejected_before_any_write() {
    let mut repo = MockUserRepository::new();
    repo.expect_get_by_reference()
        .with(eq("bob-ref"), eq("alice-ref"))
        .returning(|_, _| Ok(Some(User::from_parts(2, "bob-ref".into(), "bob".into(), String::new(), true))));
    let mut followers = MockFollowerRepository::new();
    followers.expect_create().never();

    let response = users_router(repo, followers)
        .oneshot(post_json(
            "/follow",
            serde_json::json!({ "userReferenceId": "bob-ref", "followerReferenceId": "alice-ref" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["message"], "user is already following this user");
}

#[tokio::test]
async fn follow_succeeds_with_an_empty_200() {
    let mut repo = MockUserRepository::new();
    repo.expect_get_by_reference()
        .returning(|_, _| Ok(Some(User::from_parts(2, "bob-ref".into(), "bob".into(), String::new(), false))));
    let mut followers = MockFollowerRepository::new();
    followers.expect_create().with(eq(2), eq("alice-ref")).times(1).returning(|_, _| Ok(1));

    let response = users_router(repo, followers)
        .oneshot(post_json(
            "/follow",
            serde_json::json!({ "userReferenceId": "bob-ref", "followerReferenceId": "alice-ref" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn profile_feed_requires_a_guid_viewer() {
    let mut provider = MockPostProvider::new();
    provider.expect_get_profile_feed().never();
    let router = posts::router(Arc::new(PostService::new(
        Arc::new(MockPostRepository::new()),
        Arc::new(MockLikeRepository::new()),
        Arc::new(provider),
        Arc::new(MockUsersApi::new()),
    )));

    let response = router
        .oneshot(Request::get("/profile/feed/alice/not-a-guid").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["message"], "user reference id must be a valid guid");
}

#[tokio::test]
async fn upstream_status_is_forwarded_when_creating_a_post() {
    let mut users_api = MockUsersApi::new();
    users_api
        .expect_get_id_by_reference()
        .returning(|_| Err(DomainError::Upstream { status: 404, message: "user not found".into() }));
    let mut posts_repo = MockPostRepository::new();
    posts_repo.expect_create().never();
    let router = posts::router(Arc::new(PostService::new(
        Arc::new(posts_repo),
        Arc::new(MockLikeRepository::new()),
        Arc::new(MockPostProvider::new()),
        Arc::new(users_api),
    )));

    let response = router
        .oneshot(post_json("/posts", serde_json::json!({ "userReferenceId": "ghost", "caption": "hi" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["message"], "user not found");
}

#[tokio::test]
async fn undecodable_media_is_rejected_before_the_store_is_touched() {
    let mut repo = MockMediaRepository::new();
    repo.expect_create().never();
    let router = media::router(Arc::new(MediaService::new(Arc::new(repo), Arc::new(MockObjectStore::new()))));

    let response = router
        .oneshot(post_json("/media", serde_json::json!({ "contentType": "image/png", "content": "%%%" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["message"], "content must be valid base64");
}

#[tokio::test]
async fn download_serves_raw_bytes_with_caching() {
    let mut media_api = MockMediaApi::new();
    media_api.expect_get_content().with(eq("media-ref")).returning(|_| {
        Ok(MediaContent { content_type: "image/png".into(), content: "AQID".into() })
    });
    let router = download::router(Arc::new(DownloadService::new(Arc::new(media_api))));

    let response = router.oneshot(Request::get("/media-ref").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "private, max-age=3600");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], &[1u8, 2, 3]);
}

#[tokio::test]
async fn any_download_failure_is_not_found() {
    let mut media_api = MockMediaApi::new();
    media_api
        .expect_get_content()
        .returning(|_| Err(DomainError::Upstream { status: 502, message: "bad gateway".into() }));
    let router = download::router(Arc::new(DownloadService::new(Arc::new(media_api))));

    let response = router.oneshot(Request::get("/media-ref").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
