//! # client-adapters
//!
//! JSON-over-HTTP clients for calls between the services. [`HttpClient`] is
//! the shared envelope; the typed clients implement the peer API ports from
//! `domains` on top of it.

pub mod auth;
pub mod error;
pub mod http;
pub mod media;
pub mod posts;
pub mod users;

pub use auth::AuthClient;
pub use error::ClientError;
pub use http::HttpClient;
pub use media::MediaClient;
pub use posts::PostsClient;
pub use users::UsersClient;
