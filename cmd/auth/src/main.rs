//! # auth
//!
//! Issues RS256 access tokens for valid credentials. Credentials are checked
//! by the users service; this process only holds the signing key.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::middleware::Logging;
use api_adapters::routes::auth;
use api_adapters::{telemetry, App};
use auth_adapters::JwtSigner;
use client_adapters::UsersClient;
use configs::{require, LogFormat, Settings};
use domains::ports::{TokenSigner, UsersApi};
use services::{Container, ServiceKey, TokenService};

const USERS_API: ServiceKey<dyn UsersApi> = ServiceKey::new("UsersApi");
const SIGNER: ServiceKey<dyn TokenSigner> = ServiceKey::new("TokenSigner");
const TOKEN_SERVICE: ServiceKey<TokenService> = ServiceKey::new("TokenService");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    telemetry::init(settings.log_format == LogFormat::Json);

    if let Err(err) = run(settings).await {
        tracing::error!(error = ?err, "auth service failed");
        return Err(err);
    }

    Ok(())
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let pem = settings.token_private_key_pem()?;
    let signer: Arc<dyn TokenSigner> = Arc::new(JwtSigner::rs256_pem(&pem).context("loading the signing key")?);
    let users: Arc<dyn UsersApi> = Arc::new(UsersClient::new(require(&settings.users_api_url, "USERS_API_URL")?)?);
    let expiry_minutes = settings.token.expiry_minutes;

    let mut container = Container::new();
    container.add_singleton(SIGNER, move |_| Arc::clone(&signer));
    container.add_singleton(USERS_API, move |_| Arc::clone(&users));
    container.add_service(TOKEN_SERVICE, move |ctn| {
        Arc::new(TokenService::new(ctn.get(USERS_API), ctn.get(SIGNER), expiry_minutes))
    });

    App::new(settings.port)
        .routes(auth::router(container.get(TOKEN_SERVICE)))
        .middleware(Logging)
        .serve()
        .await?;

    Ok(())
}
