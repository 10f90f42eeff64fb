//! One router per process. Each takes its use case as shared state.

pub mod auth;
pub mod download;
pub mod gateway;
pub mod media;
pub mod posts;
pub mod users;
