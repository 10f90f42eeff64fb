//! # ClientError

use domains::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// DNS, connect, timeout or client construction failure.
    #[error("http: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-200 response without a JSON body.
    #[error("http: server returned a {0} status code")]
    UnexpectedStatus(u16),

    /// Non-200 JSON response whose body is not an error envelope.
    #[error("http: failed to read json response, status code: {0}")]
    UnreadableError(u16),

    #[error("http: failed to read successful response")]
    UnreadableSuccess,

    #[error("http: invalid base url '{0}'")]
    BaseUrl(String),

    /// Caller-supplied path segment that cannot name a single resource.
    #[error("invalid path segment '{0}'")]
    InvalidSegment(String),

    /// The peer's own error, with its status and message.
    #[error("{message}")]
    Rpc { status: u16, message: String },
}

impl ClientError {
    /// Status of the peer response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus(status) | Self::UnreadableError(status) => Some(*status),
            Self::Rpc { status, .. } => Some(*status),
            Self::UnreadableSuccess => Some(200),
            Self::Transport(_) | Self::BaseUrl(_) | Self::InvalidSegment(_) => None,
        }
    }
}

/// Peer errors are relayed as-is; anything else is an internal failure.
impl From<ClientError> for DomainError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Rpc { status, message } => DomainError::Upstream { status, message },
            invalid @ ClientError::InvalidSegment(_) => DomainError::validation(invalid.to_string()),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_errors_become_upstream() {
        let err: DomainError = ClientError::Rpc { status: 409, message: "nope".into() }.into();
        assert_eq!(err, DomainError::Upstream { status: 409, message: "nope".into() });
    }

    #[test]
    fn invalid_segments_are_the_callers_fault() {
        let err: DomainError = ClientError::InvalidSegment("..".into()).into();
        assert_eq!(err, DomainError::validation("invalid path segment '..'"));
    }

    #[test]
    fn other_errors_become_internal() {
        let err: DomainError = ClientError::UnexpectedStatus(503).into();
        assert_eq!(err.status(), 500);
        assert_eq!(err.to_string(), "http: server returned a 503 status code");
    }
}
