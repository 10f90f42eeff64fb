//! # DomainError
//!
//! One error type for every layer above the adapters. Each variant knows the
//! HTTP status it is reported with, so handlers never re-inspect the cause.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Bad input shape or content (e.g. username charset, empty caption).
    #[error("{0}")]
    Validation(String),

    /// An invalid state transition, such as liking a post twice.
    #[error("{0}")]
    Conflict(String),

    /// The referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Missing or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// A peer service answered with an error; status and message are relayed.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Store, transport or decode failure.
    #[error("{0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }

    /// HTTP status this error is reported with.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Conflict(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => 500,
        }
    }
}

/// A specialized Result type for domain and service logic.
pub type DomainResult<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_variant() {
        assert_eq!(DomainError::validation("x").status(), 400);
        assert_eq!(DomainError::conflict("x").status(), 400);
        assert_eq!(DomainError::unauthorized("x").status(), 401);
        assert_eq!(DomainError::not_found("x").status(), 404);
        assert_eq!(DomainError::internal("x").status(), 500);
    }

    #[test]
    fn upstream_relays_status_and_message() {
        let err = DomainError::Upstream { status: 502, message: "bad gateway".into() };
        assert_eq!(err.status(), 502);
        assert_eq!(err.to_string(), "bad gateway");
    }
}
