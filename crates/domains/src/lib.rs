//! # domains
//!
//! Models, validation rules, wire types and port traits shared by every
//! service in the social platform. Nothing in here performs I/O.

pub mod claims;
pub mod dto;
pub mod error;
pub mod models;
pub mod password;
pub mod ports;

pub use error::{DomainError, DomainResult};
