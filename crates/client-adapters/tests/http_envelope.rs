mod common;

use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use client_adapters::{ClientError, HttpClient};
use domains::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Greeting {
    text: String,
}

fn router() -> Router {
    Router::new()
        .route("/ok", get(|| async { Json(json!({ "text": "hi" })) }))
        .route(
            "/rpc-error",
            get(|| async { (StatusCode::BAD_GATEWAY, Json(json!({ "message": "x" }))) }),
        )
        .route(
            "/charset-error",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
                    r#"{"message":"user not found"}"#,
                )
            }),
        )
        .route("/plain-error", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }))
        .route(
            "/garbled-error",
            get(|| async {
                (StatusCode::BAD_REQUEST, [(header::CONTENT_TYPE, "application/json")], "not json")
            }),
        )
        .route(
            "/garbled-ok",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], "{") }),
        )
        .route(
            "/created",
            get(|| async { (StatusCode::CREATED, Json(json!({ "text": "hi" }))) }),
        )
        .route(
            "/echo",
            post(|headers: HeaderMap, Json(body): Json<Greeting>| async move {
                let content_type = headers
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_owned();
                Json(json!({ "text": format!("{} via {content_type}", body.text) }))
            }),
        )
}

async fn client() -> HttpClient {
    HttpClient::new(&common::serve(router()).await).unwrap()
}

#[tokio::test]
async fn get_decodes_a_successful_response() {
    let greeting: Greeting = client().await.get("/ok").await.unwrap();
    assert_eq!(greeting, Greeting { text: "hi".into() });
}

#[tokio::test]
async fn post_sends_json_and_decodes_the_reply() {
    let reply: Greeting = client()
        .await
        .post("echo", &Greeting { text: "hello".into() })
        .await
        .unwrap();
    assert_eq!(reply.text, "hello via application/json");
}

#[tokio::test]
async fn post_empty_discards_the_body() {
    client()
        .await
        .post_empty("echo", &Greeting { text: "hello".into() })
        .await
        .unwrap();
}

#[tokio::test]
async fn json_error_carries_status_and_message() {
    let http = client().await;

    let err = http.get::<Greeting>("rpc-error").await.unwrap_err();
    assert!(matches!(&err, ClientError::Rpc { status: 502, message } if message == "x"));
    assert_eq!(err.to_string(), "x");

    let relayed: DomainError = err.into();
    assert_eq!(relayed.status(), 502);
}

#[tokio::test]
async fn json_content_type_parameters_are_ignored() {
    let err = client().await.get::<Greeting>("charset-error").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "user not found");
}

#[tokio::test]
async fn non_json_error_only_reports_the_status() {
    let err = client().await.get::<Greeting>("plain-error").await.unwrap_err();
    assert_eq!(err.to_string(), "http: server returned a 500 status code");

    let relayed: DomainError = err.into();
    assert_eq!(relayed.status(), 500);
}

#[tokio::test]
async fn unreadable_error_body_is_distinct() {
    let err = client().await.get::<Greeting>("garbled-error").await.unwrap_err();
    assert_eq!(err.to_string(), "http: failed to read json response, status code: 400");
}

#[tokio::test]
async fn unreadable_success_body_is_distinct() {
    let err = client().await.get::<Greeting>("garbled-ok").await.unwrap_err();
    assert_eq!(err.to_string(), "http: failed to read successful response");
}

#[tokio::test]
async fn only_200_is_success() {
    let err = client().await.get::<Greeting>("created").await.unwrap_err();
    assert_eq!(err.status(), Some(201));
}

#[tokio::test]
async fn transport_failures_are_wrapped() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let http = HttpClient::new(&format!("http://{addr}")).unwrap();
    let err = http.get::<Greeting>("ok").await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
    assert!(err.to_string().starts_with("http: "));
    assert_eq!(err.status(), None);
}
