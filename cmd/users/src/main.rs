//! # users
//!
//! Accounts, credentials, follower relationships and profile reads.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::middleware::Logging;
use api_adapters::routes::users;
use api_adapters::{telemetry, App};
use auth_adapters::{Argon2PasswordHasher, HasherOptions};
use configs::{HasherSettings, LogFormat, Settings};
use domains::ports::{FollowerRepository, HealthCheck, PasswordHasher, UserProvider, UserRepository};
use services::{Container, ServiceKey, UserService};
use storage_adapters::postgres::{
    Database, DatabaseHealthCheck, PgFollowerRepository, PgUserProvider, PgUserRepository,
};

const DATABASE: ServiceKey<Database> = ServiceKey::new("Database");
const HASHER: ServiceKey<dyn PasswordHasher> = ServiceKey::new("PasswordHasher");
const USER_REPOSITORY: ServiceKey<dyn UserRepository> = ServiceKey::new("UserRepository");
const FOLLOWER_REPOSITORY: ServiceKey<dyn FollowerRepository> = ServiceKey::new("FollowerRepository");
const USER_PROVIDER: ServiceKey<dyn UserProvider> = ServiceKey::new("UserProvider");
const USER_SERVICE: ServiceKey<UserService> = ServiceKey::new("UserService");
const HEALTH: ServiceKey<dyn HealthCheck> = ServiceKey::new("HealthCheck");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    telemetry::init(settings.log_format == LogFormat::Json);

    if let Err(err) = run(settings).await {
        tracing::error!(error = ?err, "users service failed");
        return Err(err);
    }

    Ok(())
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let db = Database::connect(settings.connection_string()?)
        .await
        .context("connecting to postgres")?;
    db.migrate().await.context("running migrations")?;

    let hasher: Arc<dyn PasswordHasher> =
        Arc::new(Argon2PasswordHasher::new(&hasher_options(&settings.password_hasher))?);
    let policy = settings.password_validator.clone();

    let mut container = Container::new();
    container.add_singleton(DATABASE, move |_| Arc::new(db.clone()));
    container.add_singleton(HASHER, move |_| Arc::clone(&hasher));
    container.add_singleton(USER_REPOSITORY, |ctn| {
        Arc::new(PgUserRepository::new((*ctn.get(DATABASE)).clone())) as Arc<dyn UserRepository>
    });
    container.add_singleton(FOLLOWER_REPOSITORY, |ctn| {
        Arc::new(PgFollowerRepository::new((*ctn.get(DATABASE)).clone())) as Arc<dyn FollowerRepository>
    });
    container.add_singleton(USER_PROVIDER, |ctn| {
        Arc::new(PgUserProvider::new((*ctn.get(DATABASE)).clone())) as Arc<dyn UserProvider>
    });
    container.add_singleton(HEALTH, |ctn| {
        Arc::new(DatabaseHealthCheck::new((*ctn.get(DATABASE)).clone())) as Arc<dyn HealthCheck>
    });
    container.add_service(USER_SERVICE, move |ctn| {
        Arc::new(UserService::new(
            ctn.get(USER_REPOSITORY),
            ctn.get(FOLLOWER_REPOSITORY),
            ctn.get(USER_PROVIDER),
            ctn.get(HASHER),
            policy.clone(),
        ))
    });

    App::new(settings.port)
        .routes(users::router(container.get(USER_SERVICE)))
        .middleware(Logging)
        .health_check(container.get(HEALTH))
        .serve()
        .await?;

    Ok(())
}

fn hasher_options(settings: &HasherSettings) -> HasherOptions {
    let defaults = HasherOptions::default();
    HasherOptions {
        memory_kib: settings.memory_kib.unwrap_or(defaults.memory_kib),
        iterations: settings.iterations.unwrap_or(defaults.iterations),
        parallelism: settings.parallelism.unwrap_or(defaults.parallelism),
        output_len: settings.output_len.unwrap_or(defaults.output_len),
        pepper: settings.pepper.clone(),
    }
}
