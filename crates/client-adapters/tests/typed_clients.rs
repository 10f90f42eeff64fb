mod common;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use client_adapters::{AuthClient, MediaClient, PostsClient, UsersClient};
use domains::dto::{CreatePostRequest, Credentials, FollowRequest, LikeRequest, MediaContent};
use domains::ports::{AuthApi, MediaApi, PostsApi, UsersApi};
use serde_json::{json, Value};

fn credentials() -> Credentials {
    Credentials { username: "jane".into(), password: "secret".into() }
}

#[tokio::test]
async fn users_client_speaks_the_users_routes() {
    let router = Router::new()
        .route(
            "/users",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "referenceId": "ref-1", "username": body["username"] }))
            }),
        )
        .route(
            "/claims",
            post(|| async { Json(json!({ "claims": { "uid": "ref-1", "username": "jane" } })) }),
        )
        .route("/users/id/{reference}", get(|Path(reference): Path<String>| async move {
            if reference == "ref-1" {
                Ok(Json(json!({ "id": 42 })))
            } else {
                Err((StatusCode::NOT_FOUND, Json(json!({ "message": "user not found" }))))
            }
        }))
        .route(
            "/info/{reference}",
            get(|Path(reference): Path<String>| async move {
                Json(json!({ "id": reference, "username": "jane", "mediaId": null, "followerCount": 3 }))
            }),
        )
        .route(
            "/follow",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["followerReferenceId"], "me");
                StatusCode::OK
            }),
        );

    let client = UsersClient::new(&common::serve(router).await).unwrap();

    let created = client.create(&credentials()).await.unwrap();
    assert_eq!(created.reference_id, "ref-1");
    assert_eq!(created.username, "jane");

    let claims = client.get_claims(&credentials()).await.unwrap();
    assert_eq!(claims.uid(), Some("ref-1"));

    assert_eq!(client.get_id_by_reference("ref-1").await.unwrap(), 42);
    let missing = client.get_id_by_reference("nope").await.unwrap_err();
    assert_eq!(missing.status(), 404);
    assert_eq!(missing.to_string(), "user not found");

    let info = client.get_info("ref-1").await.unwrap();
    assert_eq!(info.follower_count, 3);
    assert_eq!(info.media_id, None);

    client
        .follow(&FollowRequest { user_reference_id: "them".into(), follower_reference_id: "me".into() })
        .await
        .unwrap();
}

#[tokio::test]
async fn posts_client_speaks_the_posts_routes() {
    let router = Router::new()
        .route(
            "/posts",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["mediaId"], 5);
                Json(json!({ "referenceId": "post-1" }))
            }),
        )
        .route(
            "/feed/{reference}",
            get(|| async {
                Json(json!([{
                    "id": "post-1",
                    "mediaId": null,
                    "caption": "hi",
                    "posted": "2024-01-01T00:00:00Z",
                    "username": "jane",
                    "likes": 2,
                    "hasUserLiked": true,
                    "isAuthor": false
                }]))
            }),
        )
        .route(
            "/posts/like",
            post(|| async { (StatusCode::BAD_REQUEST, Json(json!({ "message": "user has already liked this post" }))) }),
        );

    let client = PostsClient::new(&common::serve(router).await).unwrap();

    let created = client
        .create(&CreatePostRequest { user_reference_id: "u".into(), media_id: Some(5), caption: "hi".into() })
        .await
        .unwrap();
    assert_eq!(created.reference_id, "post-1");

    let feed = client.get_feed("u").await.unwrap();
    assert_eq!(feed.len(), 1);
    assert!(feed[0].has_user_liked);

    let err = client
        .like(&LikeRequest { post_reference_id: "post-1".into(), user_reference_id: "u".into() })
        .await
        .unwrap_err();
    assert_eq!(err.status(), 400);
    assert_eq!(err.to_string(), "user has already liked this post");
}

#[tokio::test]
async fn media_and_auth_clients_round_trip() {
    let router = Router::new()
        .route("/media", post(|| async { Json(json!({ "id": 9, "referenceId": "m-1" })) }))
        .route(
            "/media/content/{reference}",
            get(|| async { Json(json!({ "contentType": "image/png", "content": "AAE=" })) }),
        )
        .route("/token", post(|| async { Json(json!({ "token": "jwt", "expires": 1700000000 })) }));

    let base = common::serve(router).await;
    let media = MediaClient::new(&base).unwrap();
    let auth = AuthClient::new(&base).unwrap();

    let created = media
        .create(&MediaContent { content_type: "image/png".into(), content: "AAE=".into() })
        .await
        .unwrap();
    assert_eq!(created.id, 9);

    let content = media.get_content("m-1").await.unwrap();
    assert_eq!(content.content_type, "image/png");

    let token = auth.generate_token(&credentials()).await.unwrap();
    assert_eq!(token.expires, 1_700_000_000);
}

#[tokio::test]
async fn reference_ids_stay_inside_their_route() {
    use std::sync::{Arc, Mutex};

    use axum::http::Uri;

    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    let recorder = Arc::clone(&seen);
    let router = Router::new().fallback(move |uri: Uri| {
        let recorder = Arc::clone(&recorder);
        async move {
            recorder.lock().unwrap().push(uri.to_string());
            (StatusCode::NOT_FOUND, Json(json!({ "message": "post not found" })))
        }
    });
    let base = common::serve(router).await;

    let err = PostsClient::new(&base).unwrap().get("../users/id/REF?x=", "caller-uid").await.unwrap_err();
    assert_eq!(err.status(), 404);

    let err = UsersClient::new(&base).unwrap().get_info("..").await.unwrap_err();
    assert_eq!(err.status(), 400);

    let err = MediaClient::new(&base).unwrap().get_content("a/b").await.unwrap_err();
    assert_eq!(err.status(), 404);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "/posts/..%2Fusers%2Fid%2FREF%3Fx=/caller-uid".to_owned(),
            "/media/content/a%2Fb".to_owned(),
        ]
    );
}
