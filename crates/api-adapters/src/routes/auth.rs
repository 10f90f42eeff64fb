use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use domains::dto::{AccessToken, Credentials};
use services::TokenService;

use crate::error::{ApiResult, JsonBody};

pub fn router(service: Arc<TokenService>) -> Router {
    Router::new().route("/token", post(generate_token)).with_state(service)
}

async fn generate_token(
    State(service): State<Arc<TokenService>>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> ApiResult<Json<AccessToken>> {
    Ok(Json(service.generate(&credentials).await?))
}
