//! # api-adapters
//!
//! HTTP surface of every process: the routers, the middleware chain, the
//! error envelope and the `/health` endpoint. Binaries pick the routers they
//! need and hand them to [`app::App`].

pub mod telemetry;

#[cfg(feature = "web-axum")]
pub mod app;
#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
pub mod routes;

#[cfg(feature = "web-axum")]
pub use app::App;
#[cfg(feature = "web-axum")]
pub use error::{ApiError, ApiResult};
