//! # App
//!
//! Owns the pieces every process shares: a port, the merged routers, the
//! middleware chain and the health checks behind `GET /health`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use domains::ports::HealthCheck;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::middleware::{self, Middleware};

pub const HEALTH_PATH: &str = "/health";

pub struct App {
    port: u16,
    router: Router,
    middleware: Vec<Arc<dyn Middleware>>,
    health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl App {
    pub fn new(port: u16) -> Self {
        Self { port, router: Router::new(), middleware: Vec::new(), health_checks: Vec::new() }
    }

    pub fn routes(mut self, router: Router) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// Appends to the chain; earlier middleware runs first.
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }

    pub fn into_router(self) -> Router {
        let checks: Arc<[Arc<dyn HealthCheck>]> = self.health_checks.into();
        let router = self.router.route(
            HEALTH_PATH,
            get(move || {
                let checks = Arc::clone(&checks);
                async move { health(&checks).await }
            }),
        );

        middleware::apply(router, &self.middleware).layer(TraceLayer::new_for_http())
    }

    /// Serves until ctrl-c or SIGTERM.
    pub async fn serve(self) -> std::io::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "listening");

        axum::serve(listener, self.into_router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn health(checks: &[Arc<dyn HealthCheck>]) -> (StatusCode, &'static str) {
    for check in checks {
        if let Err(err) = check.check().await {
            tracing::warn!(error = %err, "health check failed");
            return (StatusCode::BAD_GATEWAY, "Unhealthy");
        }
    }

    (StatusCode::OK, "Healthy")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down");
}
