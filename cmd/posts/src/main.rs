//! # posts
//!
//! Posts, likes and feeds. Authors are resolved through the users service.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::middleware::Logging;
use api_adapters::routes::posts;
use api_adapters::{telemetry, App};
use client_adapters::UsersClient;
use configs::{require, LogFormat, Settings};
use domains::ports::{HealthCheck, LikeRepository, PostProvider, PostRepository, UsersApi};
use services::{Container, PostService, ServiceKey};
use storage_adapters::postgres::{
    Database, DatabaseHealthCheck, PgLikeRepository, PgPostProvider, PgPostRepository,
};

const DATABASE: ServiceKey<Database> = ServiceKey::new("Database");
const USERS_API: ServiceKey<dyn UsersApi> = ServiceKey::new("UsersApi");
const POST_REPOSITORY: ServiceKey<dyn PostRepository> = ServiceKey::new("PostRepository");
const LIKE_REPOSITORY: ServiceKey<dyn LikeRepository> = ServiceKey::new("LikeRepository");
const POST_PROVIDER: ServiceKey<dyn PostProvider> = ServiceKey::new("PostProvider");
const POST_SERVICE: ServiceKey<PostService> = ServiceKey::new("PostService");
const HEALTH: ServiceKey<dyn HealthCheck> = ServiceKey::new("HealthCheck");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    telemetry::init(settings.log_format == LogFormat::Json);

    if let Err(err) = run(settings).await {
        tracing::error!(error = ?err, "posts service failed");
        return Err(err);
    }

    Ok(())
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let users: Arc<dyn UsersApi> = Arc::new(UsersClient::new(require(&settings.users_api_url, "USERS_API_URL")?)?);

    let db = Database::connect(settings.connection_string()?)
        .await
        .context("connecting to postgres")?;
    db.migrate().await.context("running migrations")?;

    let mut container = Container::new();
    container.add_singleton(DATABASE, move |_| Arc::new(db.clone()));
    container.add_singleton(USERS_API, move |_| Arc::clone(&users));
    container.add_singleton(POST_REPOSITORY, |ctn| {
        Arc::new(PgPostRepository::new((*ctn.get(DATABASE)).clone())) as Arc<dyn PostRepository>
    });
    container.add_singleton(LIKE_REPOSITORY, |ctn| {
        Arc::new(PgLikeRepository::new((*ctn.get(DATABASE)).clone())) as Arc<dyn LikeRepository>
    });
    container.add_singleton(POST_PROVIDER, |ctn| {
        Arc::new(PgPostProvider::new((*ctn.get(DATABASE)).clone())) as Arc<dyn PostProvider>
    });
    container.add_singleton(HEALTH, |ctn| {
        Arc::new(DatabaseHealthCheck::new((*ctn.get(DATABASE)).clone())) as Arc<dyn HealthCheck>
    });
    container.add_service(POST_SERVICE, |ctn| {
        Arc::new(PostService::new(
            ctn.get(POST_REPOSITORY),
            ctn.get(LIKE_REPOSITORY),
            ctn.get(POST_PROVIDER),
            ctn.get(USERS_API),
        ))
    });

    App::new(settings.port)
        .routes(posts::router(container.get(POST_SERVICE)))
        .middleware(Logging)
        .health_check(container.get(HEALTH))
        .serve()
        .await?;

    Ok(())
}
