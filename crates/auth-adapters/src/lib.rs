//! # auth-adapters
//!
//! Password hashing and access-token adapters for the `domains` security
//! ports.

pub mod error;
pub mod hasher;
#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use error::AuthError;
pub use hasher::{Argon2PasswordHasher, HasherOptions};
#[cfg(feature = "auth-jwt")]
pub use jwt::{JwtSigner, JwtVerifier};
