//! # backend
//!
//! The public gateway. Verifies bearer tokens, then fans each request out to
//! the users, posts, media and auth services.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::app::HEALTH_PATH;
use api_adapters::middleware::{Authentication, Cors, Logging};
use api_adapters::routes::gateway::{self, REGISTER_PATH, TOKEN_PATH};
use api_adapters::{telemetry, App};
use auth_adapters::JwtVerifier;
use client_adapters::{AuthClient, MediaClient, PostsClient, UsersClient};
use configs::{require, LogFormat, Settings};
use domains::ports::{AuthApi, MediaApi, PostsApi, TokenVerifier, UsersApi};
use services::{Container, Gateway, ServiceKey};

const USERS_API: ServiceKey<dyn UsersApi> = ServiceKey::new("UsersApi");
const POSTS_API: ServiceKey<dyn PostsApi> = ServiceKey::new("PostsApi");
const MEDIA_API: ServiceKey<dyn MediaApi> = ServiceKey::new("MediaApi");
const AUTH_API: ServiceKey<dyn AuthApi> = ServiceKey::new("AuthApi");
const VERIFIER: ServiceKey<dyn TokenVerifier> = ServiceKey::new("TokenVerifier");
const GATEWAY: ServiceKey<Gateway> = ServiceKey::new("Gateway");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    telemetry::init(settings.log_format == LogFormat::Json);

    if let Err(err) = run(settings).await {
        tracing::error!(error = ?err, "backend failed");
        return Err(err);
    }

    Ok(())
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let pem = settings.token_public_key_pem()?;
    let verifier: Arc<dyn TokenVerifier> =
        Arc::new(JwtVerifier::rs256_pem(&pem).context("loading the verification key")?);

    let users: Arc<dyn UsersApi> = Arc::new(UsersClient::new(require(&settings.users_api_url, "USERS_API_URL")?)?);
    let posts: Arc<dyn PostsApi> = Arc::new(PostsClient::new(require(&settings.posts_api_url, "POSTS_API_URL")?)?);
    let media: Arc<dyn MediaApi> = Arc::new(MediaClient::new(require(&settings.media_api_url, "MEDIA_API_URL")?)?);
    let auth: Arc<dyn AuthApi> = Arc::new(AuthClient::new(require(&settings.auth_api_url, "AUTH_API_URL")?)?);

    let mut container = Container::new();
    container.add_singleton(USERS_API, move |_| Arc::clone(&users));
    container.add_singleton(POSTS_API, move |_| Arc::clone(&posts));
    container.add_singleton(MEDIA_API, move |_| Arc::clone(&media));
    container.add_singleton(AUTH_API, move |_| Arc::clone(&auth));
    container.add_singleton(VERIFIER, move |_| Arc::clone(&verifier));
    container.add_service(GATEWAY, |ctn| {
        Arc::new(Gateway::new(ctn.get(USERS_API), ctn.get(POSTS_API), ctn.get(MEDIA_API), ctn.get(AUTH_API)))
    });

    let authentication = Authentication::new(container.get(VERIFIER))
        .allow(REGISTER_PATH)
        .allow(TOKEN_PATH)
        .allow(HEALTH_PATH);

    App::new(settings.port)
        .routes(gateway::router(container.get(GATEWAY)))
        .middleware(Logging)
        .middleware(Cors::new(&settings.cors_origin).context("invalid cors origin")?)
        .middleware(authentication)
        .serve()
        .await?;

    Ok(())
}
