//! # Middleware
//!
//! A [`Middleware`] sees the request before the handler and may answer it
//! itself. [`apply`] wraps a router so the first middleware in the list is the
//! outermost layer and therefore runs first.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION,
};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Router;
use domains::claims::Claims;
use domains::ports::TokenVerifier;
use domains::DomainError;

use crate::error::{ApiError, ApiResult};

pub const ALLOWED_HEADERS: &str = "Content-Type,Authorization";
pub const ALLOWED_METHODS: &str = "GET,POST,PUT,OPTIONS";

#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn handle(&self, request: Request, next: Next) -> Response;
}

/// Wraps `router` in `chain`, last entry innermost.
pub fn apply(router: Router, chain: &[Arc<dyn Middleware>]) -> Router {
    chain.iter().rev().fold(router, |router, middleware| {
        let middleware = Arc::clone(middleware);
        router.layer(axum::middleware::from_fn(move |request: Request, next: Next| {
            let middleware = Arc::clone(&middleware);
            async move { middleware.handle(request, next).await }
        }))
    })
}

/// One `info` event per request.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logging;

#[async_trait]
impl Middleware for Logging {
    async fn handle(&self, request: Request, next: Next) -> Response {
        tracing::info!(method = %request.method(), uri = %request.uri(), "request");
        next.run(request).await
    }
}

#[derive(Debug, Clone)]
pub struct Cors {
    origin: HeaderValue,
}

impl Cors {
    pub fn new(origin: &str) -> Result<Self, axum::http::header::InvalidHeaderValue> {
        Ok(Self { origin: HeaderValue::from_str(origin)? })
    }

    fn decorate(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOWED_HEADERS));
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    }
}

#[async_trait]
impl Middleware for Cors {
    async fn handle(&self, request: Request, next: Next) -> Response {
        let mut response = if request.method() == Method::OPTIONS {
            StatusCode::OK.into_response()
        } else {
            next.run(request).await
        };

        self.decorate(response.headers_mut());
        response
    }
}

/// Requires a valid bearer token on every path outside the public list and
/// stores the verified [`Claims`] in the request extensions.
pub struct Authentication {
    verifier: Arc<dyn TokenVerifier>,
    public_paths: Vec<String>,
}

impl Authentication {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier, public_paths: Vec::new() }
    }

    pub fn allow(mut self, path: impl Into<String>) -> Self {
        self.public_paths.push(path.into());
        self
    }

    fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|public| public == path)
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<Claims, DomainError> {
        let header = headers
            .get(AUTHORIZATION)
            .ok_or_else(|| DomainError::unauthorized("no auth header present"))?;

        let token = header
            .to_str()
            .ok()
            .and_then(|value| match value.split(' ').collect::<Vec<_>>().as_slice() {
                ["Bearer", token] => Some(*token),
                _ => None,
            })
            .ok_or_else(|| DomainError::unauthorized("invalid auth scheme"))?;

        self.verifier.verify(token)
    }
}

#[async_trait]
impl Middleware for Authentication {
    async fn handle(&self, mut request: Request, next: Next) -> Response {
        if self.is_public(request.uri().path()) {
            return next.run(request).await;
        }

        match self.authenticate(request.headers()) {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
                next.run(request).await
            }
            Err(err) => ApiError::from(err).into_response(),
        }
    }
}

/// Claims of the authenticated caller.
#[derive(Debug, Clone)]
pub struct Caller(pub Claims);

impl Caller {
    pub fn uid(&self) -> ApiResult<&str> {
        self.0.uid().ok_or_else(|| DomainError::unauthorized("token has no uid claim").into())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Caller)
            .ok_or_else(|| DomainError::unauthorized("no auth header present").into())
    }
}
