use thiserror::Error;

/// Construction failures; these abort startup.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid hasher options: {0}")]
    HasherOptions(String),

    #[cfg(feature = "auth-jwt")]
    #[error("invalid token key: {0}")]
    Key(#[from] jsonwebtoken::errors::Error),
}
